//! 所見の選択と詳細表示

use leptos::prelude::*;
use pir_dashboard_common::DashboardStore;

#[component]
pub fn FindingPanel(store: RwSignal<DashboardStore>) -> impl IntoView {
    let names = move || {
        store.with(|s| {
            s.payload()
                .map(|p| p.findings.iter().map(|f| f.finding.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    };
    let selected_value = move || {
        store.with(|s| s.selected_index().map(|i| i.to_string()).unwrap_or_default())
    };

    let on_change = move |ev: leptos::ev::Event| {
        let index = event_target_value(&ev).parse::<usize>().ok();
        store.update(|s| {
            if let Err(err) = s.select_finding(index) {
                web_sys::console::warn_1(&format!("finding selection failed: {}", err).into());
            }
        });
    };

    view! {
        <section class="finding-panel">
            <label class="field-label" for="finding-select">"Target Inspection Point"</label>
            <select
                id="finding-select"
                prop:value=selected_value
                disabled=move || store.with(|s| s.is_syncing())
                on:change=on_change
            >
                <option value="">"-- Choose Finding --"</option>
                {move || {
                    names()
                        .into_iter()
                        .enumerate()
                        .map(|(i, name)| view! { <option value=i.to_string()>{name}</option> })
                        .collect_view()
                }}
            </select>

            {move || {
                store
                    .with(|s| s.selected_finding().cloned())
                    .map(|finding| {
                        view! {
                            <div class="finding-detail">
                                <div class="finding-image">
                                    <img src=finding.image.clone() alt=finding.finding.clone() />
                                </div>
                                <div class="finding-text">
                                    <p class="field-label">"Observation"</p>
                                    <p class="observation">{finding.description.clone()}</p>
                                    <p class="field-label">"Required Action"</p>
                                    <p class="action">{finding.action.clone()}</p>
                                </div>
                            </div>
                        }
                    })
            }}
        </section>
    }
}
