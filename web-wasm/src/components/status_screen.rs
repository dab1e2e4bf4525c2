//! 読込中・読込失敗の全画面表示

use leptos::prelude::*;

#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="status-screen">
            <div class="spinner" />
            <p class="status-text">"Initializing data link..."</p>
        </div>
    }
}

#[component]
pub fn ErrorScreen<F>(message: String, on_retry: F) -> impl IntoView
where
    F: Fn(()) + Copy + Send + Sync + 'static,
{
    view! {
        <div class="status-screen">
            <div class="error-card">
                <h2>"System Error"</h2>
                <p class="error-message">{message}</p>
                <button class="btn btn-danger" on:click=move |_| on_retry(())>
                    "Retry"
                </button>
            </div>
        </div>
    }
}
