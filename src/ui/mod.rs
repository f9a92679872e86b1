//! egui desktop front-end.
//!
//! All visible state lives in [`UiState`] and is only touched on the eframe
//! event-loop thread. Worker and stream reader threads talk to it through a
//! [`UiDispatcher`], which queues closures that the app runs at the start of
//! the next frame.

pub mod chart_panel;
pub mod input_panel;
pub mod output_log;

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use eframe::egui;
use tracing::{debug, warn};

use crate::chart::ChartData;
use crate::orchestrator::{ExecutionState, Orchestrator, RunObserver};
use crate::process::OutputSink;
use chart_panel::ChartPanel;
use input_panel::InputPanel;
use output_log::OutputLog;

pub const WINDOW_TITLE: &str = "Algorithm Visualizer";

/// Everything the user can see that background threads may change.
#[derive(Default)]
pub struct UiState {
    pub output: OutputLog,
    pub chart: ChartPanel,
    pub status: Option<ExecutionState>,
    pub running: bool,
}

pub type UiTask = Box<dyn FnOnce(&mut UiState) + Send>;

/// Queues work for the UI thread and wakes it up.
#[derive(Clone)]
pub struct UiDispatcher {
    tasks: Sender<UiTask>,
    ctx: Option<egui::Context>,
}

impl UiDispatcher {
    /// `ctx` is used to request a repaint after each queued task; without one
    /// the receiver has to be polled.
    pub fn channel(ctx: Option<egui::Context>) -> (Self, Receiver<UiTask>) {
        let (tasks, rx) = channel();
        (Self { tasks, ctx }, rx)
    }

    pub fn run_on_ui_thread(&self, task: impl FnOnce(&mut UiState) + Send + 'static) {
        if self.tasks.send(Box::new(task)).is_err() {
            debug!("ui thread has gone away, dropping update");
            return;
        }
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}

/// Runs every queued task against `state`. Call only from the UI thread.
pub fn drain_tasks(tasks: &Receiver<UiTask>, state: &mut UiState) -> usize {
    let mut applied = 0;
    while let Ok(task) = tasks.try_recv() {
        task(state);
        applied += 1;
    }
    applied
}

impl OutputSink for UiDispatcher {
    fn append(&self, text: &str) {
        let text = text.to_string();
        self.run_on_ui_thread(move |state| state.output.append(&text));
    }
}

impl RunObserver for UiDispatcher {
    fn render(&self, chart: ChartData) {
        self.run_on_ui_thread(move |state| state.chart.model.apply(chart));
    }

    fn state_changed(&self, execution_state: ExecutionState) {
        self.run_on_ui_thread(move |state| state.status = Some(execution_state));
    }
}

pub struct VisualizerApp {
    input: InputPanel,
    state: UiState,
    tasks: Receiver<UiTask>,
    dispatcher: UiDispatcher,
    orchestrator: Arc<Orchestrator>,
}

impl VisualizerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, orchestrator: Orchestrator) -> Self {
        let (dispatcher, tasks) = UiDispatcher::channel(Some(cc.egui_ctx.clone()));
        Self {
            input: InputPanel::default(),
            state: UiState::default(),
            tasks,
            dispatcher,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Starts one execution on a worker thread. The Execute button stays
    /// disabled until it reports back.
    fn execute(&mut self) {
        if self.state.running {
            return;
        }
        self.state.output.clear();
        self.state.status = Some(ExecutionState::Idle);
        self.state.running = true;

        let params = self.input.parameters();
        let orchestrator = Arc::clone(&self.orchestrator);
        let dispatcher = self.dispatcher.clone();
        let spawned = thread::Builder::new()
            .name("benchmark-run".to_string())
            .spawn(move || {
                if let Err(error) = orchestrator.execute(&params, &dispatcher) {
                    debug!(%error, "execution finished with an error");
                }
                dispatcher.run_on_ui_thread(|state| state.running = false);
            });

        if let Err(error) = spawned {
            warn!(%error, "could not start worker thread");
            self.state.output.append(&format!("Error executing the program: {}\n", error));
            self.state.status = Some(ExecutionState::Failed);
            self.state.running = false;
        }
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        drain_tasks(&self.tasks, &mut self.state);

        egui::TopBottomPanel::top("input_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                self.input.show(ui);
                let execute = ui.add_enabled(!self.state.running, egui::Button::new("Execute"));
                if execute.clicked() {
                    self.execute();
                }
                if self.state.running {
                    ui.spinner();
                }
                if let Some(status) = self.state.status {
                    ui.label(status.to_string());
                }
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::top("output_panel")
            .resizable(true)
            .default_height(ctx.screen_rect().height() / 3.0)
            .show(ctx, |ui| self.state.output.show(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading(self.state.chart.model.title()));
            let UiState { output, chart, .. } = &mut self.state;
            chart.show(ui, output);
        });
    }
}

/// Opens the main window and blocks until it is closed.
pub fn run(orchestrator: Orchestrator) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_maximized(true)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(VisualizerApp::new(cc, orchestrator)))),
    )
}
