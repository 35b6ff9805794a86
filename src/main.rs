//! City weather and clock widget

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use cityclock::action::Action;
use cityclock::api::{self, ClientConfig, WeatherClient};
use cityclock::components::{Component, WidgetDisplay, WidgetDisplayProps};
use cityclock::effect::Effect;
use cityclock::reducer::reducer;
use cityclock::state::{
    AppState, BLINK_PERIOD_MS, CLOCK_PERIOD_MS, DeviceInstant, ERROR_DURATION_MS, TICK_MS, Timing,
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// City weather and clock widget for the terminal
#[derive(Parser, Debug)]
#[command(name = "cityclock")]
#[command(about = "Search a city's current weather next to a live clock")]
struct Args {
    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Weather API base URL
    #[arg(long, default_value = api::DEFAULT_BASE_URL)]
    base_url: String,

    /// Host serving the condition icons
    #[arg(long, default_value = api::DEFAULT_ICON_HOST)]
    icon_host: String,

    /// Request timeout in seconds (minimum 1)
    #[arg(long, default_value_t = api::DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Base tick in milliseconds; every timer is a multiple of it
    #[arg(long, default_value_t = TICK_MS, value_parser = clap::value_parser!(u64).range(10..=1000))]
    tick_ms: u64,

    /// Blinking error toggle cadence in milliseconds
    #[arg(long, default_value_t = BLINK_PERIOD_MS, value_parser = clap::value_parser!(u64).range(1..))]
    blink_ms: u64,

    /// How long an error stays before the local clock returns, in milliseconds
    #[arg(long, default_value_t = ERROR_DURATION_MS, value_parser = clap::value_parser!(u64).range(1..))]
    error_ms: u64,

    /// Write logs here (filtered by RUST_LOG); logging is off without it
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WidgetComponentId {
    Display,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WidgetContext {
    Main,
}

impl EventRoutingState<WidgetComponentId, WidgetContext> for AppState {
    fn focused(&self) -> Option<WidgetComponentId> {
        Some(WidgetComponentId::Display)
    }

    fn modal(&self) -> Option<WidgetComponentId> {
        None
    }

    fn binding_context(&self, id: WidgetComponentId) -> WidgetContext {
        match id {
            WidgetComponentId::Display => WidgetContext::Main,
        }
    }

    fn default_context(&self) -> WidgetContext {
        WidgetContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_key,
        base_url,
        icon_host,
        timeout_secs,
        tick_ms,
        blink_ms,
        error_ms,
        log_file,
        debug: debug_args,
    } = Args::parse();

    init_logging(log_file.as_deref())?;

    let timing = Timing::from_millis(tick_ms, CLOCK_PERIOD_MS, blink_ms, error_ms);
    let client = WeatherClient::new(
        ClientConfig::new(api_key)
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(timeout_secs)),
    )
    .map_err(|e| io::Error::other(format!("could not build HTTP client: {e}")))?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(timing).with_icon_host(icon_host))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        timing,
        Arc::new(client),
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// The terminal belongs to the UI, so logs only ever go to a file.
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

struct WidgetUi {
    display: WidgetDisplay,
}

impl WidgetUi {
    fn new() -> Self {
        Self {
            display: WidgetDisplay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WidgetComponentId>,
    ) {
        event_ctx.set_component_area(WidgetComponentId::Display, area);

        let props = WidgetDisplayProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.display.render(frame, area, props);
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WidgetDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    timing: Timing,
    client: Arc<WeatherClient>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(WidgetUi::new()));
    let mut bus: EventBus<AppState, Action, WidgetComponentId, WidgetContext> = EventBus::new();
    let keybindings: Keybindings<WidgetContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(WidgetComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Start(DeviceInstant::now())),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(timing.tick_ms),
                    || Action::Tick(DeviceInstant::now()),
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&client)),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<WeatherClient>) {
    match effect {
        Effect::FetchWeather { city, seq } => {
            // Stale completions are dropped by the reducer's sequence check
            ctx.tasks().spawn("weather", async move {
                match client.current_weather(&city).await {
                    Ok(result) => Action::WeatherDidLoad(seq, result),
                    Err(e) => Action::WeatherDidError(seq, e),
                }
            });
        }
    }
}
