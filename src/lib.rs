mod app;
mod backend;
mod commands;
mod domain;
mod infra;
mod shared;

pub(crate) use app::{app_state, notice, resident};
pub(crate) use infra::{app_paths, executor, settings};
pub(crate) use shared::blocking;

use app_state::BackendState;
use backend::StopMode;
use commands::*;
use shared::mutex_ext::MutexExt;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default()
        .manage(BackendState::default())
        .manage(resident::ResidentState::default())
        .plugin(tauri_plugin_opener::init());

    #[cfg(desktop)]
    let builder = builder.plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
        // A second launch must not spawn a second supervisor: it only brings
        // the existing window to the foreground and exits on its own.
        resident::show_main_window(app);
    }));

    let app = builder
        .on_window_event(resident::on_window_event)
        .setup(|app| {
            crate::app::logging::init(app.handle());
            install_panic_hook(app.handle().clone());

            #[cfg(desktop)]
            if let Err(err) = resident::setup_tray(app.handle()) {
                tracing::error!("系统托盘初始化失败: {}", err);
            }

            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let cfg = match blocking::run("startup_read_settings", {
                    let app_handle = app_handle.clone();
                    move || Ok(settings::read(&app_handle).unwrap_or_default())
                })
                .await
                {
                    Ok(cfg) => cfg,
                    Err(err) => {
                        tracing::warn!("配置读取失败，使用默认值: {}", err);
                        settings::AppSettings::default()
                    }
                };

                app_handle
                    .state::<resident::ResidentState>()
                    .set_tray_enabled(cfg.tray_enabled);

                if let Ok(dir) = app_paths::logs_dir(&app_handle) {
                    let retention_days = cfg.log_retention_days;
                    let _ = blocking::run("startup_prune_logs", move || {
                        Ok(crate::app::logging::prune_old_logs(&dir, retention_days))
                    })
                    .await;
                }

                if cfg.backend_autostart {
                    let started = {
                        let state = app_handle.state::<BackendState>();
                        let mut manager = state.0.lock_or_recover();
                        manager.start(&app_handle, &cfg)
                    };
                    if let Err(err) = started {
                        tracing::error!("后端自动启动失败: {}", err);
                    }
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            settings_get,
            settings_set,
            notice_send,
            app_status_get,
            app_quit,
            app_force_quit,
            link_open_external,
            system_volume_get,
            system_volume_set,
            system_mute_toggle,
            wifi_scan,
            wifi_connect,
            wifi_disconnect,
            wifi_current_get,
            network_interfaces_get,
            system_shutdown,
            system_restart,
            system_sleep,
            backend_status_get,
            backend_start,
            backend_stop,
            backend_restart
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { api, .. } = &event {
            tracing::info!("收到退出请求，开始清理...");
            api.prevent_exit();

            let app_handle = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                crate::app::cleanup::cleanup_before_exit(&app_handle, StopMode::Graceful).await;
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                std::process::exit(0);
            });
            return;
        }

        #[cfg(target_os = "macos")]
        if let tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } = event
        {
            if !has_visible_windows {
                resident::show_main_window(app_handle);
            }
        }
    });
}

/// Any uncaught fault runs the shutdown procedure, then the process exits
/// non-zero. The cleanup entry flag keeps this from racing a normal exit.
fn install_panic_hook(app: tauri::AppHandle) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("未捕获的致命错误: {}", info);
        default_hook(info);

        let app = app.clone();
        std::thread::spawn(move || {
            tauri::async_runtime::block_on(crate::app::cleanup::cleanup_before_exit(
                &app,
                StopMode::Force,
            ));
            std::process::exit(1);
        });
        std::thread::sleep(std::time::Duration::from_secs(5));
        std::process::exit(1);
    }));
}
