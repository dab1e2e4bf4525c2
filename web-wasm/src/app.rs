//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use pir_dashboard_common::{DashboardStore, RemoteCollaborator, StoreState};
use crate::api::apps_script::{configured_endpoint, FetchRemote};
use crate::components::{
    header::Header,
    status_screen::{ErrorScreen, LoadingScreen},
    general_info::GeneralInfo,
    finding_panel::FindingPanel,
    material_section::MaterialSection,
};

/// 画面の切り替え単位
#[derive(Clone, PartialEq)]
enum Screen {
    Loading,
    Failed(String),
    Dashboard,
}

/// 同期結果の通知
#[derive(Clone, PartialEq)]
struct Notice {
    message: String,
    is_error: bool,
}

#[component]
pub fn App() -> impl IntoView {
    let store = RwSignal::new(DashboardStore::new());
    let notice = RwSignal::new(None::<Notice>);
    let remote = FetchRemote::new(configured_endpoint());

    // 読込（実行中なら何もしない）
    let load = move |_: ()| {
        let started = store
            .try_update(|s| s.begin_load().is_ok())
            .unwrap_or(false);
        if !started {
            return;
        }
        spawn_local(async move {
            let result = remote.load_dashboard().await;
            store.update(|s| {
                let _ = s.finish_load(result);
            });
        });
    };

    // 同期して、成功したら再読込
    let save = move |_: ()| {
        let request = match store.try_update(|s| s.begin_save()) {
            Some(Ok(request)) => request,
            Some(Err(err)) => {
                notice.set(Some(Notice { message: err.to_string(), is_error: true }));
                return;
            }
            None => return,
        };
        spawn_local(async move {
            let result = remote
                .save_materials(&request.finding_name, &request.materials)
                .await;
            match store.try_update(|s| s.finish_save(result)) {
                Some(Ok(_)) => {
                    notice.set(Some(Notice { message: "Sync Successful!".into(), is_error: false }));
                    load(());
                }
                Some(Err(err)) => {
                    notice.set(Some(Notice { message: err.to_string(), is_error: true }));
                }
                None => {}
            }
        });
    };

    // 同期中と同期失敗はダッシュボードのまま表示する
    let screen = Memo::new(move |_| {
        store.with(|s| match s.state() {
            StoreState::Idle | StoreState::Loading => Screen::Loading,
            StoreState::LoadError(message) => Screen::Failed(message.clone()),
            _ => Screen::Dashboard,
        })
    });

    load(());

    view! {
        <div class="container">
            <Header />

            {move || notice.get().map(|n| {
                let class = if n.is_error { "notice notice-error" } else { "notice notice-success" };
                view! {
                    <div class=class>
                        <span>{n.message}</span>
                        <button class="btn-icon" on:click=move |_| notice.set(None)>"✕"</button>
                    </div>
                }
            })}

            {move || match screen.get() {
                Screen::Loading => view! { <LoadingScreen /> }.into_any(),
                Screen::Failed(message) => {
                    view! { <ErrorScreen message=message on_retry=load /> }.into_any()
                }
                Screen::Dashboard => view! {
                    <main class="dashboard">
                        <GeneralInfo store=store />
                        <FindingPanel store=store />
                        <Show
                            when=move || store.with(|s| s.selected_finding().is_some())
                            fallback=|| view! {
                                <p class="text-muted">"Select a finding to view its material list."</p>
                            }
                        >
                            <MaterialSection store=store on_save=save />
                        </Show>
                    </main>
                }
                .into_any(),
            }}
        </div>
    }
}
