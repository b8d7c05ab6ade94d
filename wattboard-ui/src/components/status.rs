//! Status Banner Component
//!
//! Loading, error and success banners pinned to the top right corner.

use leptos::*;
use wattboard::{Banner, BannerKind, StatusBoard};

/// Every visible banner, stacked
#[component]
pub fn StatusBanners(board: RwSignal<StatusBoard>) -> impl IntoView {
    view! {
        <div class="status-banners">
            {move || {
                board.with(|board| board.visible())
                    .into_iter()
                    .map(|banner| view! { <StatusBanner banner=banner /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn StatusBanner(banner: Banner) -> impl IntoView {
    let (class, icon, background) = match banner.kind {
        BannerKind::Loading => ("loading-indicator", "fa-solid fa-spinner fa-spin", "#4299e1"),
        BannerKind::Error => ("error-indicator", "fa-solid fa-exclamation-triangle", "#f56565"),
        BannerKind::Success => ("success-indicator", "fa-solid fa-check-circle", "#48bb78"),
    };

    view! {
        <div
            class=class
            style=format!(
                "position: fixed; top: 10px; right: 10px; background: {}; color: white; \
                 padding: 10px 20px; border-radius: 5px; font-size: 12px; z-index: 1000; \
                 box-shadow: 0 2px 8px rgba(0,0,0,0.2);",
                background
            )
        >
            <i class=icon></i>
            " "
            {banner.message}
        </div>
    }
}
