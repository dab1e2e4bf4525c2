//! 資材リスト（表示・編集）

use leptos::prelude::*;
use pir_dashboard_common::{DashboardStore, MaterialField, MaterialRecord};

#[component]
pub fn MaterialSection<FS>(store: RwSignal<DashboardStore>, on_save: FS) -> impl IntoView
where
    FS: Fn(()) + Copy + Send + Sync + 'static,
{
    let is_editing = move || store.with(|s| s.session().is_editing());
    let selected_count = move || store.with(|s| s.session().selected_count());
    let all_selected = move || store.with(|s| s.session().all_selected());
    // 選択の変更では行を作り直さない
    let rows = Memo::new(move |_| store.with(|s| s.session().materials().to_vec()));

    let toggle_edit = move |_| {
        store.update(|s| {
            s.session_mut().toggle_edit_mode();
        })
    };
    let toggle_all = move |_| {
        store.update(|s| {
            let _ = s.session_mut().toggle_select_all();
        })
    };

    view! {
        <section class="material-section">
            <Show when=move || store.with(|s| s.is_syncing())>
                <div class="sync-overlay">
                    <div class="spinner" />
                    <p>"SYNCHRONIZING..."</p>
                </div>
            </Show>

            <div class="material-header">
                <div>
                    <h2>"MATERIAL LIST (A5:J)"</h2>
                    <Show when=is_editing>
                        <p class="selected-count">{move || format!("{} selected", selected_count())}</p>
                    </Show>
                </div>
                <button
                    class=move || if is_editing() { "btn btn-cancel" } else { "btn btn-primary" }
                    on:click=toggle_edit
                >
                    {move || if is_editing() { "CANCEL" } else { "EDIT MODE" }}
                </button>
            </div>

            <div class="table-wrapper">
                <table class="material-table">
                    <thead>
                        <tr>
                            <Show when=is_editing>
                                <th class="col-check">
                                    <input type="checkbox" prop:checked=all_selected on:change=toggle_all />
                                </th>
                            </Show>
                            <th class="col-number">"#"</th>
                            {MaterialField::ALL
                                .iter()
                                .map(|field| view! { <th>{field.label()}</th> })
                                .collect_view()}
                            <Show when=is_editing>
                                <th class="col-action" />
                            </Show>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows.get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, record)| view! { <MaterialRow store=store index=index record=record /> })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </div>

            <MaterialFooter store=store on_save=on_save />
        </section>
    }
}

#[component]
fn MaterialRow(store: RwSignal<DashboardStore>, index: usize, record: MaterialRecord) -> impl IntoView {
    let is_editing = move || store.with(|s| s.session().is_editing());
    let is_selected = move || store.with(|s| s.session().is_selected(index));

    let cells = MaterialField::ALL
        .into_iter()
        .map(|field| {
            let value = record.get(field).to_string();
            // 確定（change）時だけ反映する
            let on_change = move |ev: leptos::ev::Event| {
                let value = event_target_value(&ev);
                store.update(|s| {
                    if let Err(err) = s.session_mut().update_field(index, field, value) {
                        web_sys::console::warn_1(&err.to_string().into());
                    }
                });
            };
            view! {
                <td>
                    <input
                        type="text"
                        class="cell-input"
                        placeholder="—"
                        readonly=move || !is_editing()
                        prop:value=value
                        on:change=on_change
                    />
                </td>
            }
        })
        .collect_view();

    let toggle_row = move |_| {
        store.update(|s| {
            let _ = s.session_mut().toggle_row(index);
        })
    };
    let delete_row = move |_| {
        store.update(|s| {
            let _ = s.session_mut().remove_at(index);
        })
    };

    view! {
        <tr class=move || if is_selected() { "row-selected" } else { "" }>
            <Show when=is_editing>
                <td class="col-check">
                    <input type="checkbox" prop:checked=is_selected on:change=toggle_row />
                </td>
            </Show>
            <td class="col-number">{index + 1}</td>
            {cells}
            <Show when=is_editing>
                <td class="col-action">
                    <button class="btn-icon" title="Delete row" on:click=delete_row>"✕"</button>
                </td>
            </Show>
        </tr>
    }
}

#[component]
fn MaterialFooter<FS>(store: RwSignal<DashboardStore>, on_save: FS) -> impl IntoView
where
    FS: Fn(()) + Copy + Send + Sync + 'static,
{
    let is_editing = move || store.with(|s| s.session().is_editing());
    let selected_count = move || store.with(|s| s.session().selected_count());
    let record_count = move || store.with(|s| s.session().materials().len());

    let add_row = move |_| store.update(|s| s.session_mut().add_row());
    let clear_all = move |_| store.update(|s| s.session_mut().reset());
    let discard = move |_| store.update(|s| s.session_mut().discard_and_exit());
    let delete_selected = move |_| {
        let count = selected_count();
        if !confirm(&format!("Delete {} records?", count)) {
            return;
        }
        store.update(|s| {
            let _ = s.session_mut().remove_selected();
        });
    };

    view! {
        <div class="material-footer">
            <Show
                when=is_editing
                fallback=move || view! {
                    <p class="read-only-note">
                        {move || format!("Read-only mode enabled. {} records found.", record_count())}
                    </p>
                }
            >
                <button class="btn btn-dark" on:click=add_row>"ADD ROW"</button>
                <Show when=move || { selected_count() > 0 }>
                    <button class="btn btn-danger" on:click=delete_selected>
                        {move || format!("DELETE ({})", selected_count())}
                    </button>
                </Show>
                <button class="btn btn-secondary" on:click=clear_all>"CLEAR ALL"</button>
                <button class="btn btn-secondary" on:click=discard>"DISCARD"</button>
                <div class="spacer" />
                <button
                    class="btn btn-primary"
                    disabled=move || store.with(|s| s.is_syncing())
                    on:click=move |_| on_save(())
                >
                    "SYNC TO SHEET"
                </button>
            </Show>
        </div>
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
