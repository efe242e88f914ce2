// src/services/fake.rs

use crate::services::driver::{DriverError, ElementHandle, Locator, UiDriver};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::time::Duration;

/// One calendar cell in the fake site.
#[derive(Debug, Clone)]
pub struct FakeDay {
    pub number: u32,
    pub class: String,
}

impl FakeDay {
    pub fn new(number: u32, class: &str) -> Self {
        Self {
            number,
            class: class.to_string(),
        }
    }
}

/// Scriptable in-memory model of the ordering site. Tests configure the
/// calendar, the per-category menus and the failure points, then assert on
/// what the engine clicked.
#[derive(Debug, Clone)]
pub struct FakeSite {
    pub login_succeeds: bool,
    pub logged_in: bool,
    pub show_location_prompt: bool,
    pub location_label: String,
    pub days: Vec<FakeDay>,
    /// Category name -> item descriptions, in listing order.
    pub categories: HashMap<String, Vec<String>>,
    /// Days whose detail view shows the no-service banner.
    pub in_day_no_service: HashSet<u32>,
    /// Days whose confirmation click is rejected by the site.
    pub fail_confirm_days: HashSet<u32>,
    /// Days whose confirm control only renders after a first lookup missed
    /// it, the way late XHR updates behave.
    pub late_confirm_days: HashSet<u32>,
    /// Keep a hidden no-service template node in every day view, listed
    /// before any real banner.
    pub no_service_template: bool,
}

impl Default for FakeSite {
    fn default() -> Self {
        Self {
            login_succeeds: true,
            logged_in: false,
            show_location_prompt: true,
            location_label: "COHEN PISO 1".to_string(),
            days: Vec::new(),
            categories: HashMap::new(),
            in_day_no_service: HashSet::new(),
            fail_confirm_days: HashSet::new(),
            late_confirm_days: HashSet::new(),
            no_service_template: false,
        }
    }
}

impl FakeSite {
    /// A site already past the login form.
    pub fn logged_in() -> Self {
        Self {
            logged_in: true,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, name: &str, items: &[&str]) -> Self {
        self.categories
            .insert(name.to_string(), items.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FakeElement {
    UserField,
    PassField,
    SubmitButton,
    DashboardMarker,
    DayCell(usize),
    LocationOption,
    NoServiceTemplate,
    NoServiceBanner,
    CategoryTab(String),
    Item { category: String, index: usize },
    ConfirmButton,
    BackButton,
}

#[derive(Debug)]
struct RunState {
    site: FakeSite,
    current_day: Option<u32>,
    current_category: Option<String>,
    location_selected: bool,
    confirm_revealed: bool,
    handles: Vec<FakeElement>,
    filled: Vec<String>,
    day_clicks: Vec<u32>,
    category_opens: Vec<String>,
    item_clicks: Vec<String>,
    confirmations: Vec<u32>,
    navigations: Vec<String>,
}

/// In-memory `UiDriver` used by every test that would otherwise need a real
/// browser session.
pub struct FakeDriver {
    state: Mutex<RunState>,
}

impl FakeDriver {
    pub fn new(site: FakeSite) -> Self {
        Self {
            state: Mutex::new(RunState {
                site,
                current_day: None,
                current_category: None,
                location_selected: false,
                confirm_revealed: false,
                handles: Vec::new(),
                filled: Vec::new(),
                day_clicks: Vec::new(),
                category_opens: Vec::new(),
                item_clicks: Vec::new(),
                confirmations: Vec::new(),
                navigations: Vec::new(),
            }),
        }
    }

    pub fn filled_values(&self) -> Vec<String> {
        self.state.lock().unwrap().filled.clone()
    }

    pub fn day_clicks(&self) -> Vec<u32> {
        self.state.lock().unwrap().day_clicks.clone()
    }

    pub fn category_opens(&self) -> Vec<String> {
        self.state.lock().unwrap().category_opens.clone()
    }

    /// Descriptions of the menu items the engine actually clicked.
    pub fn item_clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().item_clicks.clone()
    }

    /// Day numbers whose order reached a successful confirmation click.
    pub fn confirmations(&self) -> Vec<u32> {
        self.state.lock().unwrap().confirmations.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }
}

fn visible_elements(state: &RunState) -> Vec<FakeElement> {
    let site = &state.site;
    if !site.logged_in {
        return vec![
            FakeElement::UserField,
            FakeElement::PassField,
            FakeElement::SubmitButton,
        ];
    }
    match state.current_day {
        None => {
            let mut out = vec![FakeElement::DashboardMarker];
            out.extend((0..site.days.len()).map(FakeElement::DayCell));
            out
        }
        Some(day) => {
            let mut out = Vec::new();
            if site.show_location_prompt && !state.location_selected {
                out.push(FakeElement::LocationOption);
            }
            if site.no_service_template {
                out.push(FakeElement::NoServiceTemplate);
            }
            if site.in_day_no_service.contains(&day) {
                out.push(FakeElement::NoServiceBanner);
            }
            for name in site.categories.keys() {
                out.push(FakeElement::CategoryTab(name.clone()));
            }
            if let Some(category) = &state.current_category {
                if let Some(items) = site.categories.get(category) {
                    out.extend((0..items.len()).map(|index| FakeElement::Item {
                        category: category.clone(),
                        index,
                    }));
                }
            }
            if !site.late_confirm_days.contains(&day) || state.confirm_revealed {
                out.push(FakeElement::ConfirmButton);
            }
            out.push(FakeElement::BackButton);
            out
        }
    }
}

fn element_text(state: &RunState, element: &FakeElement) -> String {
    match element {
        FakeElement::UserField | FakeElement::PassField => String::new(),
        FakeElement::SubmitButton => "INGRESAR".to_string(),
        FakeElement::DashboardMarker => "HOLA, usuario".to_string(),
        FakeElement::DayCell(i) => state
            .site
            .days
            .get(*i)
            .map(|d| d.number.to_string())
            .unwrap_or_default(),
        FakeElement::LocationOption => state.site.location_label.clone(),
        FakeElement::NoServiceTemplate | FakeElement::NoServiceBanner => {
            "DÍA SIN SERVICIO".to_string()
        }
        FakeElement::CategoryTab(name) => name.clone(),
        FakeElement::Item { category, index } => state
            .site
            .categories
            .get(category)
            .and_then(|items| items.get(*index))
            .cloned()
            .unwrap_or_default(),
        FakeElement::ConfirmButton => "CONFIRMAR".to_string(),
        FakeElement::BackButton => "VOLVER".to_string(),
    }
}

fn css_matches(element: &FakeElement, selector: &str) -> bool {
    match element {
        FakeElement::UserField => selector == r#"input[type="text"]"#,
        FakeElement::PassField => selector == r#"input[type="password"]"#,
        FakeElement::SubmitButton => selector == r#"input[type="submit"]"#,
        FakeElement::DayCell(_) => selector == r#"div[id^="date_"]"#,
        FakeElement::Item { .. } => selector == "input.selection_items",
        FakeElement::CategoryTab(name) => {
            selector == format!(r#"div[data-dimension="{}"]"#, name)
        }
        _ => false,
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        state.current_day = None;
        state.current_category = None;
        Ok(())
    }

    async fn wait_for_idle(&self, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn locate(&self, locator: &Locator) -> Result<Vec<ElementHandle>, DriverError> {
        let mut state = self.state.lock().unwrap();
        let matching: Vec<FakeElement> = visible_elements(&state)
            .into_iter()
            .filter(|element| match locator {
                Locator::Css(selector) => css_matches(element, selector),
                Locator::Text(needle) => element_text(&state, element)
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
            })
            .collect();
        // A late confirm control renders once something has looked for it
        // and missed.
        if matching.is_empty() {
            if let (Locator::Text(needle), Some(day)) = (locator, state.current_day) {
                if needle.to_lowercase().contains("confirmar")
                    && state.site.late_confirm_days.contains(&day)
                {
                    state.confirm_revealed = true;
                }
            }
        }
        let mut handles = Vec::with_capacity(matching.len());
        for element in matching {
            state.handles.push(element);
            handles.push(ElementHandle(state.handles.len() - 1));
        }
        Ok(handles)
    }

    async fn element_text(&self, handle: &ElementHandle) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        let element = state
            .handles
            .get(handle.0)
            .ok_or(DriverError::UnknownHandle(handle.0))?;
        Ok(element_text(&state, element))
    }

    async fn element_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let state = self.state.lock().unwrap();
        let element = state
            .handles
            .get(handle.0)
            .ok_or(DriverError::UnknownHandle(handle.0))?;
        Ok(match (element, name) {
            (FakeElement::DayCell(i), "id") => state
                .site
                .days
                .get(*i)
                .map(|d| format!("date_2026-02-{:02}", d.number)),
            (FakeElement::DayCell(i), "class") => {
                state.site.days.get(*i).map(|d| d.class.clone())
            }
            (FakeElement::Item { category, index }, "data-desc") => state
                .site
                .categories
                .get(category)
                .and_then(|items| items.get(*index))
                .cloned(),
            _ => None,
        })
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let element = state
            .handles
            .get(handle.0)
            .ok_or(DriverError::UnknownHandle(handle.0))?
            .clone();
        match element {
            FakeElement::SubmitButton => {
                state.site.logged_in = state.site.login_succeeds;
            }
            FakeElement::DayCell(i) => {
                let number = state
                    .site
                    .days
                    .get(i)
                    .ok_or(DriverError::UnknownHandle(handle.0))?
                    .number;
                state.current_day = Some(number);
                state.current_category = None;
                state.location_selected = false;
                state.confirm_revealed = false;
                state.day_clicks.push(number);
            }
            FakeElement::LocationOption => {
                state.location_selected = true;
            }
            FakeElement::CategoryTab(name) => {
                state.current_category = Some(name.clone());
                state.category_opens.push(name);
            }
            FakeElement::Item { category, index } => {
                let desc = state
                    .site
                    .categories
                    .get(&category)
                    .and_then(|items| items.get(index))
                    .cloned()
                    .unwrap_or_default();
                state.item_clicks.push(desc);
            }
            FakeElement::ConfirmButton => {
                let day = state.current_day.unwrap_or(0);
                if state.site.fail_confirm_days.contains(&day) {
                    return Err(DriverError::Backend(
                        "confirmation rejected by site".to_string(),
                    ));
                }
                state.confirmations.push(day);
            }
            FakeElement::BackButton => {
                state.current_day = None;
                state.current_category = None;
            }
            _ => {}
        }
        Ok(())
    }

    async fn fill(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.handles.get(handle.0).is_none() {
            return Err(DriverError::UnknownHandle(handle.0));
        }
        state.filled.push(value.to_string());
        Ok(())
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DriverError> {
        let state = self.state.lock().unwrap();
        let element = state
            .handles
            .get(handle.0)
            .ok_or(DriverError::UnknownHandle(handle.0))?;
        // Template nodes sit in the DOM but never display.
        if matches!(element, FakeElement::NoServiceTemplate) {
            return Ok(false);
        }
        Ok(visible_elements(&state).contains(element))
    }

    async fn go_back(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.current_day = None;
        state.current_category = None;
        Ok(())
    }
}
