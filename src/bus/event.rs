//! Event Module
//!
//! The closed set of application signals carried by the bus. Each signal is
//! a tagged variant with a typed payload, so any component may emit or
//! subscribe to any kind without per-event payload ambiguity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

// == Event Kind ==
/// Identifies one signal in the application's event namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // Session lifecycle
    LoggedIn,
    LoggedOut,
    SessionActive,
    Unauthorized,
    AccountActive,
    // Navigation
    Navigate,
    BackButtonShow,
    BackButtonHide,
    // Loading indicator
    LoaderShow,
    LoaderHide,
    LoaderProgressShow,
    LoaderProgressUpdate,
    LoaderProgressHide,
    // Modals
    ModalShow,
    ModalHide,
    PolicyModalShow,
    PolicyModalHide,
    // Application state
    ShowMaintenancePage,
    ExportReport,
    CookiePreferencesChange,
    // API request lifecycle
    ApiRequestComplete,
    ApiRequestError,
    LastUpdated,
}

impl fmt::Display for EventKind {
    /// Snake_case names, matching the portal's historical wire naming in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::LoggedIn => "logged_in",
            EventKind::LoggedOut => "logged_out",
            EventKind::SessionActive => "session_active",
            EventKind::Unauthorized => "unauthorized_401",
            EventKind::AccountActive => "account_active",
            EventKind::Navigate => "navigate",
            EventKind::BackButtonShow => "back_button_show",
            EventKind::BackButtonHide => "back_button_hide",
            EventKind::LoaderShow => "loader_show",
            EventKind::LoaderHide => "loader_hide",
            EventKind::LoaderProgressShow => "loader_progress_show",
            EventKind::LoaderProgressUpdate => "loader_progress_update",
            EventKind::LoaderProgressHide => "loader_progress_hide",
            EventKind::ModalShow => "modal_show",
            EventKind::ModalHide => "modal_hide",
            EventKind::PolicyModalShow => "policy_modal_show",
            EventKind::PolicyModalHide => "policy_modal_hide",
            EventKind::ShowMaintenancePage => "show_maintenance_page",
            EventKind::ExportReport => "export_report",
            EventKind::CookiePreferencesChange => "cookie_preferences_change",
            EventKind::ApiRequestComplete => "api_request_complete",
            EventKind::ApiRequestError => "api_request_error",
            EventKind::LastUpdated => "last_updated",
        };
        write!(f, "{}", name)
    }
}

// == Event ==
/// One application signal plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A session was established
    LoggedIn,
    /// The session ended by user action
    LoggedOut,
    /// The session was confirmed active by the API layer
    SessionActive,
    /// The API layer observed a 401; auth state must be invalidated
    Unauthorized,
    /// The account was (re)activated
    AccountActive,
    /// Request the router to move to the given path
    Navigate { path: String },
    /// Show the back button, returning to the given path
    BackButtonShow { target: String },
    BackButtonHide,
    /// Show the loading indicator, optionally with a message
    LoaderShow { message: Option<String> },
    LoaderHide,
    LoaderProgressShow,
    LoaderProgressUpdate { percent: u8 },
    LoaderProgressHide,
    /// Open the shared modal dialog
    ModalShow { id: String, title: String, body: String },
    ModalHide,
    /// Open the policy modal for the named policy (terms, privacy, cookies)
    PolicyModalShow { policy: String },
    PolicyModalHide,
    /// The API layer observed a 503; route to the maintenance page
    ShowMaintenancePage,
    /// Request a report export in the given format
    ExportReport { format: String },
    /// Cookie consent preferences changed
    CookiePreferencesChange,
    /// An API request finished successfully
    ApiRequestComplete { url: String, data: Value },
    /// An API request failed
    ApiRequestError { url: String, status: u16, message: String },
    /// The API layer reported when the underlying data was last refreshed
    LastUpdated { at: DateTime<Utc> },
}

impl Event {
    // == Kind ==
    /// The namespace entry this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::LoggedIn => EventKind::LoggedIn,
            Event::LoggedOut => EventKind::LoggedOut,
            Event::SessionActive => EventKind::SessionActive,
            Event::Unauthorized => EventKind::Unauthorized,
            Event::AccountActive => EventKind::AccountActive,
            Event::Navigate { .. } => EventKind::Navigate,
            Event::BackButtonShow { .. } => EventKind::BackButtonShow,
            Event::BackButtonHide => EventKind::BackButtonHide,
            Event::LoaderShow { .. } => EventKind::LoaderShow,
            Event::LoaderHide => EventKind::LoaderHide,
            Event::LoaderProgressShow => EventKind::LoaderProgressShow,
            Event::LoaderProgressUpdate { .. } => EventKind::LoaderProgressUpdate,
            Event::LoaderProgressHide => EventKind::LoaderProgressHide,
            Event::ModalShow { .. } => EventKind::ModalShow,
            Event::ModalHide => EventKind::ModalHide,
            Event::PolicyModalShow { .. } => EventKind::PolicyModalShow,
            Event::PolicyModalHide => EventKind::PolicyModalHide,
            Event::ShowMaintenancePage => EventKind::ShowMaintenancePage,
            Event::ExportReport { .. } => EventKind::ExportReport,
            Event::CookiePreferencesChange => EventKind::CookiePreferencesChange,
            Event::ApiRequestComplete { .. } => EventKind::ApiRequestComplete,
            Event::ApiRequestError { .. } => EventKind::ApiRequestError,
            Event::LastUpdated { .. } => EventKind::LastUpdated,
        }
    }
}
