// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::fmt;
use std::io::Write;

use repaint_core::pacer::UpdateTime;
use repaint_core::planner::RepaintMode;
use repaint_core::rect::Rect;
use repaint_core::time::HostTime;
use repaint_core::trace::{
    BufferAgeEvent, PresentationEvent, RedrawClipEvent, RepaintPlanEvent, ScheduleEvent,
    SwapEvent, SwapKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

/// `x,y wxh`, or `whole` for an unbounded area.
struct Area(Option<Rect>);

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(r) => write!(f, "{},{} {}x{}", r.x, r.y, r.width, r.height),
            None => f.write_str("whole"),
        }
    }
}

fn swap_name(kind: SwapKind) -> &'static str {
    match kind {
        SwapKind::Full => "full",
        SwapKind::WithDamage => "damage",
        SwapKind::Region => "region",
        SwapKind::Finish => "finish",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        let _ = writeln!(
            self.writer,
            "[clip] view={} add={} bounds={}",
            e.view.0,
            Area(e.clip),
            Area(e.bounds),
        );
    }

    fn on_repaint_plan(&mut self, e: &RepaintPlanEvent) {
        let mode = match e.mode {
            RepaintMode::Full => "full".to_owned(),
            RepaintMode::Clipped { logical, scissor } => format!(
                "clipped logical={} scissor={}",
                Area(Some(logical)),
                Area(Some(scissor))
            ),
            RepaintMode::Skip => "skip".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[plan] frame={} view={} {mode} damage={} swap_with_damage={}",
            e.frame_index,
            e.view.0,
            Area(e.recorded_damage),
            e.swap_with_damage,
        );
    }

    fn on_buffer_age(&mut self, e: &BufferAgeEvent) {
        match e.repair {
            Some(repair) => {
                let _ = writeln!(
                    self.writer,
                    "[age] frame={} view={} age={} repair={}",
                    e.frame_index,
                    e.view.0,
                    e.age,
                    Area(Some(repair)),
                );
            }
            None => {
                let _ = writeln!(
                    self.writer,
                    "[age] frame={} view={} age={} INVALID",
                    e.frame_index, e.view.0, e.age,
                );
            }
        }
    }

    fn on_swap(&mut self, e: &SwapEvent) {
        let _ = writeln!(
            self.writer,
            "[swap] frame={} view={} {} region={} id={} at {:.1}µs",
            e.frame_index,
            e.view.0,
            swap_name(e.kind),
            Area(e.region),
            e.swap_id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
            us(e.submitted_at),
        );
    }

    fn on_presentation(&mut self, e: &PresentationEvent) {
        let at = e
            .presented_at
            .map_or_else(|| "?".to_owned(), |t| format!("{:.1}µs", us(t)));
        let status = if e.spurious { " SPURIOUS" } else { "" };
        let _ = writeln!(
            self.writer,
            "[present] view={} id={} at={at} rate={:.2}Hz{status}",
            e.view.0,
            e.swap_id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
            e.refresh_rate,
        );
    }

    fn on_schedule(&mut self, e: &ScheduleEvent) {
        let update = match e.update {
            UpdateTime::Unscheduled => "unscheduled".to_owned(),
            UpdateTime::Immediate(_) => "immediate".to_owned(),
            UpdateTime::At(t) => format!("{:.1}µs", us(t)),
            UpdateTime::Indefinite => "indefinite".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[schedule] view={} now={:.1}µs delay={}ms next={update}",
            e.view.0,
            us(e.now),
            e.sync_delay_ms,
        );
    }
}
