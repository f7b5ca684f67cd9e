// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) into
//! [Chrome Trace Event Format][spec] JSON.
//!
//! Each view becomes one thread (`tid`). Events without a timestamp of their
//! own are placed at the most recent timestamp seen before them.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use repaint_core::planner::RepaintMode;
use repaint_core::rect::Rect;
use repaint_core::time::HostTime;
use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(recorded: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::with_capacity(recorded.len());
    let mut last_ts = 0.0;

    for event in recorded {
        let tid = event.view().0;
        let value = match event {
            RecordedEvent::RedrawClip(e) => json!({
                "ph": "i",
                "name": "RedrawClip",
                "cat": "Damage",
                "ts": last_ts,
                "pid": 0,
                "tid": tid,
                "s": "t",
                "args": {
                    "clip": rect_json(e.clip),
                    "bounds": rect_json(e.bounds),
                }
            }),
            RecordedEvent::RepaintPlan(e) => {
                let (mode, logical, scissor) = match e.mode {
                    RepaintMode::Full => ("full", None, None),
                    RepaintMode::Clipped { logical, scissor } => {
                        ("clipped", Some(logical), Some(scissor))
                    }
                    RepaintMode::Skip => ("skip", None, None),
                };
                json!({
                    "ph": "i",
                    "name": "RepaintPlan",
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "mode": mode,
                        "logical": rect_json(logical),
                        "scissor": rect_json(scissor),
                        "swap_with_damage": e.swap_with_damage,
                        "recorded_damage": rect_json(e.recorded_damage),
                    }
                })
            }
            RecordedEvent::BufferAge(e) => json!({
                "ph": "i",
                "name": "BufferAge",
                "cat": "Damage",
                "ts": last_ts,
                "pid": 0,
                "tid": tid,
                "s": "t",
                "args": {
                    "frame_index": e.frame_index,
                    "age": e.age,
                    "repair": rect_json(e.repair),
                }
            }),
            RecordedEvent::Swap(e) => {
                last_ts = host_us(e.submitted_at);
                json!({
                    "ph": "i",
                    "name": "Swap",
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "kind": format!("{:?}", e.kind),
                        "region": rect_json(e.region),
                        "swap_id": e.swap_id,
                    }
                })
            }
            RecordedEvent::Presentation(e) => {
                if let Some(at) = e.presented_at {
                    last_ts = host_us(at);
                }
                json!({
                    "ph": "i",
                    "name": "Presentation",
                    "cat": "Pacing",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "swap_id": e.swap_id,
                        "refresh_rate": e.refresh_rate,
                        "spurious": e.spurious,
                    }
                })
            }
            RecordedEvent::Schedule(e) => {
                last_ts = host_us(e.now);
                json!({
                    "ph": "i",
                    "name": "Schedule",
                    "cat": "Pacing",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "sync_delay_ms": e.sync_delay_ms,
                        "update": format!("{:?}", e.update),
                        "target_us": e.update.time().map(host_us),
                    }
                })
            }
        };
        events.push(value);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn host_us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

fn rect_json(rect: Option<Rect>) -> Value {
    match rect {
        Some(r) => json!([r.x, r.y, r.width, r.height]),
        None => Value::Null,
    }
}
