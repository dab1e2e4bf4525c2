//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="header-brand">
                <span class="header-logo">"✈"</span>
                <div>
                    <h1>"PIR DASHBOARD PRO"</h1>
                    <p class="header-subtitle">"Aircraft Inspection Data Link"</p>
                </div>
            </div>
            <div class="header-live">
                <span class="live-dot" />
                "LIVE SYNC ACTIVE"
            </div>
        </header>
    }
}
