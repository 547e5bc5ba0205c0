use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{bail, Result};
use gtk::prelude::*;
use marquee_core::Orientation;
use notify::Watcher;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::{
    config::{CONFIG_FILE_NAME, STYLE_FILE_NAME},
    panel::Panel,
};

pub const APP_ID: &str = "com.github.cr3eperall.marquee";

pub enum BackendServerCommand {
    ReloadConfig(),
}

pub struct App {
    pub application: gtk::Application,
    pub config_dir: PathBuf,
    pub orientation_override: Option<Orientation>,
}

impl App {
    pub fn new(config_dir: PathBuf, orientation_override: Option<Orientation>) -> Self {
        let application = gtk::Application::builder().application_id(APP_ID).build();
        Self {
            application,
            config_dir,
            orientation_override,
        }
    }

    pub fn run(self) -> Result<()> {
        log::info!("pid: {}", std::process::id());
        log::info!("config dir: {}", self.config_dir.display());

        let panel: Rc<RefCell<Option<Panel>>> = Rc::new(RefCell::new(None));
        let (server_send, mut server_recv) = unbounded_channel::<BackendServerCommand>();

        let config_dir = self.config_dir.clone();
        let orientation_override = self.orientation_override;
        let panel1 = panel.clone();
        self.application.connect_activate(move |app| {
            if let Some(panel) = panel1.borrow().as_ref() {
                panel.present();
                return;
            }
            log::info!("building panel");
            let new_panel = Panel::new(app, config_dir.clone(), orientation_override);
            let panel2 = panel1.clone();
            new_panel.window().connect_close_request(move |_| {
                match panel2.try_borrow_mut() {
                    Ok(mut panel) => {
                        if let Some(panel) = panel.as_mut() {
                            panel.teardown();
                        }
                    }
                    Err(_) => log::error!("panel busy while closing"),
                }
                glib::Propagation::Proceed
            });
            new_panel.present();
            panel1.replace(Some(new_panel));
        });

        //server command consumer
        let panel1 = panel.clone();
        glib::MainContext::default().spawn_local(async move {
            while let Some(command) = server_recv.recv().await {
                match command {
                    BackendServerCommand::ReloadConfig() => {
                        // without this sleep, reading the config file sometimes gives an empty file.
                        glib::timeout_future(Duration::from_millis(50)).await;
                        // one reload covers every write queued meanwhile
                        while server_recv.try_recv().is_ok() {}

                        let Ok(mut panel) = panel1.try_borrow_mut() else {
                            log::warn!("panel busy, skipping reload");
                            continue;
                        };
                        if let Some(panel) = panel.as_mut() {
                            panel.reload();
                        }
                    }
                }
            }
        });

        let _watcher = match self.watch_config(server_send) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                log::warn!("failed to start config file watcher, restart marquee to get automatic config updates: {err:#}");
                None
            }
        };

        //start application
        let exit_code = self.application.run_with_args::<&str>(&[]);
        drop(panel.take());
        if exit_code != glib::ExitCode::SUCCESS {
            bail!("application exited with {exit_code:?}");
        }
        Ok(())
    }

    fn watch_config(
        &self,
        server_send: UnboundedSender<BackendServerCommand>,
    ) -> Result<notify::RecommendedWatcher> {
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(evt) => {
                    if !is_config_event(&evt) {
                        return;
                    }
                    if server_send
                        .send(BackendServerCommand::ReloadConfig())
                        .is_err()
                    {
                        log::debug!("reload requested after shutdown");
                    }
                }
                Err(err) => {
                    log::error!("notify watcher error: {err}")
                }
            })?;
        watcher.watch(&self.config_dir, notify::RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }
}

fn is_config_event(evt: &notify::Event) -> bool {
    let relevant_kind = matches!(
        evt.kind,
        notify::EventKind::Modify(notify::event::ModifyKind::Data(_))
            | notify::EventKind::Create(_)
    );
    relevant_kind
        && evt.paths.iter().any(|path| {
            path.file_name()
                .is_some_and(|name| name == CONFIG_FILE_NAME || name == STYLE_FILE_NAME)
        })
}
