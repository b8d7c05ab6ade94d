//! Reactive Status State
//!
//! [`StatusSink`] over a Leptos signal. Banner expiry runs on `gloo`
//! timeouts carrying the banner's ticket, so a timer from an earlier show
//! leaves a re-shown banner alone.

use gloo_timers::callback::Timeout;
use leptos::*;
use wattboard::{BannerTicket, StatusBoard, StatusSink};

#[derive(Clone, Copy)]
pub struct SignalStatus {
    pub board: RwSignal<StatusBoard>,
}

impl SignalStatus {
    pub fn new() -> Self {
        Self {
            board: create_rw_signal(StatusBoard::new()),
        }
    }

    fn expire_later(&self, ticket: Option<BannerTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let board = self.board;
        let millis = u32::try_from(ticket.ttl.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            board.update(|board| {
                board.expire(ticket);
            });
        })
        .forget();
    }
}

impl StatusSink for SignalStatus {
    fn show_loading(&mut self) {
        self.board.update(|board| {
            board.show_loading();
        });
    }

    fn hide_loading(&mut self) {
        self.board.update(StatusBoard::hide_loading);
    }

    fn show_error(&mut self, message: &str) {
        let ticket = self.board.try_update(|board| board.show_error(message));
        self.expire_later(ticket);
    }

    fn show_success(&mut self) {
        let ticket = self.board.try_update(StatusBoard::show_success);
        self.expire_later(ticket);
    }
}
