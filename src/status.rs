//! Status indicator state
//!
//! Loading, error and success banners. At most one of each exists; showing
//! one again replaces its message and restarts its lifetime. Expiry is
//! driven by the caller's timer through a [`BannerTicket`] so a stale timer
//! can never remove a newer banner.

use std::time::Duration;

/// How long the error banner stays up after its latest show
pub const ERROR_TTL: Duration = Duration::from_millis(5000);

/// How long the success banner stays up after its latest show
pub const SUCCESS_TTL: Duration = Duration::from_millis(2000);

pub const LOADING_MESSAGE: &str = "Memuat data...";
pub const SUCCESS_MESSAGE: &str = "Data berhasil diperbarui";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Loading,
    Error,
    Success,
}

/// A visible banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    generation: u64,
}

/// Handle for expiring one particular show of a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTicket {
    pub kind: BannerKind,
    generation: u64,
    pub ttl: Duration,
}

/// The set of banners currently on screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    loading: Option<Banner>,
    error: Option<Banner>,
    success: Option<Banner>,
    generation: u64,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Show the loading banner. Returns `false` if it was already up.
    pub fn show_loading(&mut self) -> bool {
        if self.loading.is_some() {
            return false;
        }
        let generation = self.next_generation();
        self.loading = Some(Banner {
            kind: BannerKind::Loading,
            message: LOADING_MESSAGE.to_string(),
            generation,
        });
        true
    }

    pub fn hide_loading(&mut self) {
        self.loading = None;
    }

    /// Show or refresh the error banner
    pub fn show_error(&mut self, message: &str) -> BannerTicket {
        let generation = self.next_generation();
        self.error = Some(Banner {
            kind: BannerKind::Error,
            message: message.to_string(),
            generation,
        });
        BannerTicket {
            kind: BannerKind::Error,
            generation,
            ttl: ERROR_TTL,
        }
    }

    /// Show or refresh the success banner
    pub fn show_success(&mut self) -> BannerTicket {
        let generation = self.next_generation();
        self.success = Some(Banner {
            kind: BannerKind::Success,
            message: SUCCESS_MESSAGE.to_string(),
            generation,
        });
        BannerTicket {
            kind: BannerKind::Success,
            generation,
            ttl: SUCCESS_TTL,
        }
    }

    /// Remove the banner a ticket refers to, unless it has been re-shown
    /// since. Returns whether anything was removed.
    pub fn expire(&mut self, ticket: BannerTicket) -> bool {
        let slot = match ticket.kind {
            BannerKind::Loading => &mut self.loading,
            BannerKind::Error => &mut self.error,
            BannerKind::Success => &mut self.success,
        };
        match slot {
            Some(banner) if banner.generation == ticket.generation => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn loading(&self) -> Option<&Banner> {
        self.loading.as_ref()
    }

    pub fn error(&self) -> Option<&Banner> {
        self.error.as_ref()
    }

    pub fn success(&self) -> Option<&Banner> {
        self.success.as_ref()
    }

    /// Visible banners in stacking order
    pub fn visible(&self) -> Vec<Banner> {
        [&self.loading, &self.error, &self.success]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Where the dashboard reports loading and failure
pub trait StatusSink {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn show_success(&mut self);
}

impl StatusSink for StatusBoard {
    fn show_loading(&mut self) {
        StatusBoard::show_loading(self);
    }

    fn hide_loading(&mut self) {
        StatusBoard::hide_loading(self);
    }

    fn show_error(&mut self, message: &str) {
        StatusBoard::show_error(self, message);
    }

    fn show_success(&mut self) {
        StatusBoard::show_success(self);
    }
}
