//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! round or menu.  No game logic is performed; this module only translates
//! state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use star_catcher::config::RoundConfig;
use star_catcher::entities::{
    PersistedSettings, RecordOutcome, RoundState, Target, TargetKind, TargetPhase,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIME: Color = Color::Cyan;
const C_HUD_TIME_LOW: Color = Color::Red;
const C_STAR_NORMAL: Color = Color::Yellow;
const C_STAR_BONUS: Color = Color::Magenta;
const C_STAR_BOMB: Color = Color::Red;
const C_FADING: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// Seconds left at which the clock turns red.
const LOW_TIME_SECS: u32 = 5;

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(
    out: &mut W,
    settings: &PersistedSettings,
    config: &RoundConfig,
    variant_label: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  STAR  CATCHER  ★";
    centred(out, cx, cy.saturating_sub(5), title, Color::Cyan)?;

    let hs_str = format!("High score: {}", settings.high_score);
    centred(out, cx, cy.saturating_sub(3), &hs_str, Color::Yellow)?;

    let mode_str = format!("Mode: {variant_label}");
    centred(out, cx, cy.saturating_sub(2), &mode_str, Color::White)?;

    let (sound_str, sound_color) = if settings.sound_enabled {
        ("♪ Sound: ON", Color::Green)
    } else {
        ("♪ Sound: OFF", Color::DarkGrey)
    };
    centred(out, cx, cy, sound_str, sound_color)?;

    let legend: &[(TargetKind, &str, Color, &str)] = &[
        (TargetKind::Normal, "(★)", C_STAR_NORMAL, "star"),
        (TargetKind::Bonus, "{✦}", C_STAR_BONUS, "bonus star"),
        (TargetKind::Bomb, "[✸]", C_STAR_BOMB, "bomb"),
    ];
    // Only kinds this round can spawn, with their points
    let rows = legend
        .iter()
        .filter_map(|(kind, sym, color, desc)| {
            config.score_for(*kind).map(|points| (*sym, *color, *desc, points))
        });
    for (i, (sym, color, desc, points)) in rows.enumerate() {
        let row = cy + 2 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!(" {desc} ({points:+})")))?;
    }

    centred(
        out,
        cx,
        cy + 6,
        "ENTER : Start   S : Sound on/off   Q : Quit",
        C_HINT,
    )?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Round screen ──────────────────────────────────────────────────────────────

/// Render one complete frame of a round.  `result` is set once the round has
/// ended and the score was offered to the store.
pub fn render_round<W: Write>(
    out: &mut W,
    state: &RoundState,
    result: Option<&RecordOutcome>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state)?;
    draw_hud(out, state)?;

    for target in &state.targets {
        draw_target(out, target)?;
    }

    draw_controls_hint(out, state)?;

    if let Some(outcome) = result {
        draw_game_over(out, state, outcome)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.bounds.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, state: &RoundState) -> std::io::Result<()> {
    let w = state.bounds.width as usize;
    let h = state.bounds.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(state.bounds.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &RoundState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    let time_text = format!("Time: {:>3}", state.time_remaining_secs);
    let time_color = if state.time_remaining_secs <= LOW_TIME_SECS {
        C_HUD_TIME_LOW
    } else {
        C_HUD_TIME
    };
    let rx = state
        .bounds
        .width
        .saturating_sub(time_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(time_color))?;
    out.queue(Print(&time_text))?;

    if !state.sound_enabled {
        let muted = "[muted]";
        let mx = (state.bounds.width / 2).saturating_sub(muted.len() as u16 / 2);
        out.queue(cursor::MoveTo(mx, 0))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(muted))?;
    }

    Ok(())
}

// ── Targets ───────────────────────────────────────────────────────────────────

fn draw_target<W: Write>(out: &mut W, target: &Target) -> std::io::Result<()> {
    // 3 cells wide, centred on target.x
    let (sprite, color) = match (target.phase, target.kind) {
        (TargetPhase::Fading, _) => (" · ", C_FADING),
        (TargetPhase::Visible, TargetKind::Normal) => ("(★)", C_STAR_NORMAL),
        (TargetPhase::Visible, TargetKind::Bonus) => ("{✦}", C_STAR_BONUS),
        (TargetPhase::Visible, TargetKind::Bomb) => ("[✸]", C_STAR_BOMB),
    };
    out.queue(cursor::MoveTo((target.x - 1).max(0) as u16, target.y as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &RoundState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, state.bounds.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Click the stars!   Q : Back to menu"))?;
    Ok(())
}

// ── Round-over overlay ────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &RoundState,
    outcome: &RecordOutcome,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    let record_line = if outcome.updated {
        format!("New record: {}!", outcome.high_score)
    } else {
        format!("High score: {}", outcome.high_score)
    };
    let record_color = if outcome.updated {
        Color::Green
    } else {
        Color::DarkGrey
    };
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Cyan),
        ("║    TIME'S  UP    ║", Color::Cyan),
        ("╚══════════════════╝", Color::Cyan),
        (&score_line, Color::Yellow),
        (&record_line, record_color),
        ("ENTER - Menu  Q - Quit", Color::White),
    ];

    let cx = state.bounds.width / 2;
    let start_row = (state.bounds.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        centred(out, cx, start_row + i as u16, msg, *color)?;
    }

    Ok(())
}

fn centred<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    msg: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}
