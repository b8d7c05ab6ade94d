//! App Wiring
//!
//! Connects the dashboard core to the browser: `gloo` intervals drive the
//! poll session, `spawn_local` runs each request, and document events
//! pause, resume and refresh.

use gloo_timers::callback::Interval;
use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, EventTarget, HtmlElement, HtmlSelectElement, KeyboardEvent,
    PageTransitionEvent,
};
use wattboard::{
    fetch, ChartUnit, Dashboard, DashboardConfig, PollSession, PollTask, Scheduler, ViewBindings,
};

use crate::api::{apply_api_override, config_source, HttpBackend};
use crate::charts::{CanvasDoughnutHost, CanvasLineChart};
use crate::components::StatusBanners;
use crate::dom::{build_bindings, DomNode};
use crate::logging;
use crate::state::SignalStatus;

const HOURLY_CANVAS_ID: &str = "hourlyChart";
const PIE_CANVAS_ID: &str = "pieRoomChart";
const UNIT_SELECT_ID: &str = "unitSelect";
const REFRESH_BUTTON_ID: &str = "refresh-btn";

type BrowserDashboard =
    Dashboard<ViewBindings<DomNode>, CanvasLineChart, CanvasDoughnutHost, SignalStatus>;

/// Repeating timers that poll through a weak client reference
pub struct BrowserScheduler {
    client: Weak<Client>,
}

impl Scheduler for BrowserScheduler {
    type Handle = Interval;

    fn schedule_every(&self, task: PollTask, period: Duration) -> Interval {
        let client = self.client.clone();
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Interval::new(millis, move || {
            if let Some(client) = client.upgrade() {
                client.poll(task);
            }
        })
    }
}

/// One dashboard instance bound to the page
pub struct Client {
    session: RefCell<PollSession<BrowserScheduler>>,
    dashboard: RefCell<BrowserDashboard>,
    backend: HttpBackend,
}

impl Client {
    pub fn new(document: &Document, config: &DashboardConfig, status: SignalStatus) -> Rc<Self> {
        let dashboard = Dashboard::new(
            &config.display,
            build_bindings(document),
            CanvasLineChart::new(document, HOURLY_CANVAS_ID),
            CanvasDoughnutHost::new(document, PIE_CANVAS_ID),
            status,
        );
        let backend = HttpBackend::new(config.api.clone());
        let polling = config.polling.clone();

        Rc::new_cyclic(|client| Client {
            session: RefCell::new(PollSession::new(
                BrowserScheduler {
                    client: client.clone(),
                },
                polling,
            )),
            dashboard: RefCell::new(dashboard),
            backend,
        })
    }

    /// Start timers and poll every task once
    pub fn start(self: &Rc<Self>) {
        let due = self.session.borrow_mut().start();
        for task in due {
            self.poll(task);
        }
    }

    /// Stop timers and abort requests in flight
    pub fn pause(&self) {
        self.session.borrow_mut().pause();
    }

    pub fn is_running(&self) -> bool {
        self.session.borrow().is_running()
    }

    /// Show the loading banner and fetch live readings now
    pub fn refresh(self: &Rc<Self>) {
        if !self.is_running() {
            tracing::debug!("Session not running, refresh skipped");
            return;
        }
        self.dashboard.borrow_mut().show_loading();
        self.poll(PollTask::Realtime);
    }

    pub fn select_unit(&self, unit: ChartUnit) {
        self.dashboard.borrow_mut().select_unit(unit);
    }

    /// Pause for a cached page, otherwise release timers, requests and
    /// chart instances
    pub fn leave_page(&self, persisted: bool) {
        self.session.borrow_mut().leave_page(persisted);
        if !persisted {
            self.dashboard.borrow_mut().teardown();
        }
    }

    /// Run one poll cycle in the background
    pub fn poll(self: &Rc<Self>, task: PollTask) {
        let Some((id, registration)) = self.session.borrow_mut().begin_request() else {
            tracing::debug!(%task, "Session not running, poll skipped");
            return;
        };

        let client = Rc::clone(self);
        spawn_local(async move {
            let outcome = fetch(&client.backend, task, registration).await;
            client.session.borrow_mut().finish_request(id);
            let now = chrono::Local::now().naive_local();
            client.dashboard.borrow_mut().handle(outcome, now);
        });
    }
}

/// Read the page config and initialize logging from it
pub fn load_config() -> DashboardConfig {
    let parsed = config_source().map(|source| DashboardConfig::from_toml_str(&source));
    let (mut config, problem) = match parsed {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (DashboardConfig::default(), Some(e)),
        None => (DashboardConfig::default(), None),
    };

    logging::init(&config.logging);
    if let Some(e) = problem {
        tracing::warn!(error = %e, "Invalid dashboard config, using defaults");
    }

    apply_api_override(&mut config.api);
    tracing::info!(base_url = %config.api.base_url, "Dashboard config ready");
    config
}

/// Mount the banners into `.container`, or the body if it is missing
fn mount_status(document: &Document, status: SignalStatus) {
    let board = status.board;
    let container = document
        .query_selector(".container")
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());

    match container {
        Some(container) => mount_to(container, move || view! { <StatusBanners board=board /> }),
        None => {
            tracing::warn!("No .container element, mounting banners on body");
            mount_to_body(move || view! { <StatusBanners board=board /> });
        }
    }
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        tracing::warn!(event, error = ?e, "Failed to add event listener");
    }
    closure.forget();
}

fn page_persisted(event: &Event) -> bool {
    event
        .dyn_ref::<PageTransitionEvent>()
        .map(PageTransitionEvent::persisted)
        .unwrap_or(false)
}

fn install_listeners(document: &Document, client: &Rc<Client>) {
    let doc = document.clone();
    let visibility_client = Rc::clone(client);
    listen(document, "visibilitychange", move |_| {
        if doc.hidden() {
            tracing::info!("Tab hidden - pausing refresh");
            visibility_client.pause();
        } else {
            tracing::info!("Tab visible - resuming refresh");
            visibility_client.start();
        }
    });

    let key_client = Rc::clone(client);
    listen(document, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if matches!(key.key().as_str(), "r" | "R") && !key.ctrl_key() && !key.meta_key() {
            key_client.refresh();
        }
    });

    if let Some(button) = document.get_element_by_id(REFRESH_BUTTON_ID) {
        let button_client = Rc::clone(client);
        listen(&button, "click", move |_| button_client.refresh());
    }

    if let Some(select) = document
        .get_element_by_id(UNIT_SELECT_ID)
        .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
    {
        let select_client = Rc::clone(client);
        let selector = select.clone();
        listen(&select, "change", move |_| match ChartUnit::from_str(&selector.value()) {
            Ok(unit) => select_client.select_unit(unit),
            Err(e) => tracing::warn!(error = %e, "Ignoring unit selection"),
        });
    }

    if let Some(window) = web_sys::window() {
        let hide_client = Rc::clone(client);
        listen(&window, "pagehide", move |event| {
            let persisted = page_persisted(&event);
            tracing::info!(persisted, "Page hidden");
            hide_client.leave_page(persisted);
        });

        let show_doc = document.clone();
        let show_client = Rc::clone(client);
        listen(&window, "pageshow", move |event| {
            if page_persisted(&event) && !show_doc.hidden() && !show_client.is_running() {
                tracing::info!("Page restored from cache - resuming refresh");
                show_client.start();
            }
        });
    }
}

/// Bind the dashboard to the current page and start polling
pub fn run(config: DashboardConfig) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        tracing::error!("No document available");
        return;
    };

    let status = SignalStatus::new();
    mount_status(&document, status);

    let client = Client::new(&document, &config, status);
    client.dashboard.borrow_mut().show_loading();

    if document.hidden() {
        tracing::info!("Tab hidden at startup, waiting for visibility");
    } else {
        client.start();
    }

    install_listeners(&document, &client);
    tracing::info!("Wattboard v{} started", env!("CARGO_PKG_VERSION"));
}
