mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use star_catcher::audio::{Audio, Silent, TerminalBell};
use star_catcher::config::{RoundConfig, Variant};
use star_catcher::controller::RoundController;
use star_catcher::entities::{Bounds, PersistedSettings, RecordOutcome, RoundEvent};
use star_catcher::store::{JsonFileBackend, KeyValueBackend, SettingsStore, PREFS_GROUP};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    /// 30 s rounds, a star every 1.5 s
    Classic,
    /// 60 s rounds, jittered spawns, bonus stars and bombs
    Arcade,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Arcade => Variant::Arcade,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "star_catcher", about = "Catch as many stars as you can before time runs out")]
struct Cli {
    /// Built-in round preset
    #[arg(long, value_enum, default_value = "classic")]
    variant: VariantArg,

    /// TOML file overriding the round settings (replaces the preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score and sound setting are kept
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Log destination; the terminal itself is busy drawing the game
    #[arg(long, default_value = "star_catcher.log")]
    log_file: PathBuf,

    /// Seed for star placement, for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Never ring the terminal bell, whatever the sound setting says
    #[arg(long)]
    no_bell: bool,
}

/// Level applied when `RUST_LOG` gives none, so `RUST_LOG=debug` still wins.
fn fallback_level(rust_log: Option<&str>) -> Option<log::LevelFilter> {
    match rust_log {
        Some(filter) if !filter.trim().is_empty() => None,
        _ => Some(log::LevelFilter::Info),
    }
}

fn init_logging(path: &Path) {
    let mut builder = env_logger::Builder::from_default_env();
    let rust_log = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    if let Some(level) = fallback_level(rust_log.as_deref()) {
        builder.filter_level(level);
    }
    match File::create(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            // stderr would scribble over the alternate screen
            eprintln!("cannot open log file {}: {e}; logging disabled", path.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn play_area() -> std::io::Result<Bounds> {
    let (width, height) = terminal::size()?;
    Ok(Bounds { width, height })
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write, B: KeyValueBackend>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &mut PersistedSettings,
    store: &mut SettingsStore<B>,
    audio: &mut dyn Audio,
    config: &RoundConfig,
    variant_label: &str,
) -> std::io::Result<MenuResult> {
    set_music(audio, settings.sound_enabled);
    display::render_menu(out, settings, config, variant_label)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    settings.sound_enabled = !settings.sound_enabled;
                    if let Err(e) = store.set_sound_enabled(settings.sound_enabled) {
                        log::warn!("Could not save sound setting: {e}");
                    }
                    set_music(audio, settings.sound_enabled);
                    display::render_menu(out, settings, config, variant_label)?;
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(Event::Resize(..)) => display::render_menu(out, settings, config, variant_label)?,
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        }
    }
}

fn set_music(audio: &mut dyn Audio, on: bool) {
    if let Err(e) = audio.set_music(on) {
        log::warn!("Music unavailable: {e}");
    }
}

// ── Round loop ────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// The controller keeps its own timer queue in round-clock milliseconds; each
/// frame advances the clock so due ticks and spawns run in order, then feeds
/// clicks in and draws.
fn round_loop<W: Write, B: KeyValueBackend>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    controller: &mut RoundController<StdRng>,
    store: &mut SettingsStore<B>,
    settings: &mut PersistedSettings,
    audio: &mut dyn Audio,
) -> std::io::Result<bool> {
    let started = Instant::now();
    let mut outcome: Option<RecordOutcome> = None;

    loop {
        let frame_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        // Run due ticks first so a click never lands after the clock ran out
        for event in controller.advance(now_ms) {
            if let RoundEvent::RoundEnded { final_score } = event {
                set_music(audio, false);
                let result = match store.record_score(final_score) {
                    Ok(result) => result,
                    Err(e) => {
                        log::warn!("Could not save high score: {e}");
                        RecordOutcome {
                            updated: final_score > settings.high_score,
                            high_score: settings.high_score.max(final_score),
                        }
                    }
                };
                settings.high_score = result.high_score;
                outcome = Some(result);
            }
        }

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                }) => match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        controller.stop();
                        return Ok(true);
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        let finished = outcome.is_some();
                        controller.stop();
                        // Q on the results screen quits; mid-round it abandons
                        return Ok(finished);
                    }
                    KeyCode::Enter if outcome.is_some() => return Ok(false),
                    _ => {}
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    let hit = controller.click(column as i32, row as i32, now_ms);
                    if hit.is_some() && settings.sound_enabled {
                        if let Err(e) = audio.play_hit() {
                            log::warn!("Hit sound failed: {e}");
                        }
                    }
                }
                Event::Resize(width, height) => controller.resize(Bounds { width, height }),
                _ => {}
            }
        }

        display::render_round(out, controller.state(), outcome.as_ref())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file);
    log::info!("Parsed arguments: {:?}", cli);

    let config = match &cli.config {
        Some(path) => RoundConfig::load_from_file(path)
            .with_context(|| format!("loading round config {}", path.display()))?,
        None => RoundConfig::preset(cli.variant.into()),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &cli, config);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exiting on error: {e:#}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    config: RoundConfig,
) -> anyhow::Result<()> {
    let prefs_path = cli.prefs.clone().unwrap_or_else(JsonFileBackend::default_path);
    let mut store = SettingsStore::new(JsonFileBackend::new(prefs_path, PREFS_GROUP));
    let mut settings = store.load().unwrap_or_else(|e| {
        log::warn!("Could not read settings, using defaults: {e}");
        PersistedSettings::default()
    });

    let mut audio: Box<dyn Audio> = if cli.no_bell {
        Box::new(Silent::default())
    } else {
        Box::new(TerminalBell::new(stdout()))
    };

    let variant_label = if cli.config.is_some() {
        "custom"
    } else {
        match cli.variant {
            VariantArg::Classic => "classic",
            VariantArg::Arcade => "arcade",
        }
    };

    let mut round_no: u64 = 0;
    loop {
        match show_menu(
            out,
            rx,
            &mut settings,
            &mut store,
            audio.as_mut(),
            &config,
            variant_label,
        )? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let rng = match cli.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(round_no)),
                    None => StdRng::from_entropy(),
                };
                round_no += 1;
                let mut controller = RoundController::start_round(
                    config.clone(),
                    play_area()?,
                    settings.sound_enabled,
                    0,
                    rng,
                )
                .context("starting round")?;
                let quit = round_loop(
                    out,
                    rx,
                    &mut controller,
                    &mut store,
                    &mut settings,
                    audio.as_mut(),
                )?;
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    set_music(audio.as_mut(), false);
    Ok(())
}
