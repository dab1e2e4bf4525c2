//! 一般情報パネル

use leptos::prelude::*;
use pir_dashboard_common::DashboardStore;

#[component]
pub fn GeneralInfo(store: RwSignal<DashboardStore>) -> impl IntoView {
    // バックエンドが返した順に並べる
    let entries = move || {
        store.with(|s| {
            s.payload()
                .map(|p| {
                    p.general_data
                        .iter()
                        .map(|(label, value)| (label.to_string(), value.to_string()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    };

    view! {
        <section class="general-info">
            {move || {
                entries()
                    .into_iter()
                    .map(|(label, value)| {
                        let value = if value.trim().is_empty() { "—".to_string() } else { value };
                        view! {
                            <div class="info-item">
                                <p class="info-label">{label}</p>
                                <p class="info-value">{value}</p>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </section>
    }
}
