//! Interactive playback loop.
//!
//! Input lines and countdown ticks arrive on one channel and are handled on
//! the main thread. Each timed step gets its own [`Ticker`]; dropping the
//! ticker cancels it, and any tick already in flight carries the old timer
//! id and is discarded by the playback engine.

use crate::render;
use lowimpact_core::{DayIndex, KeyValueStore, Result, StepAdvance, TimerId, Trainer};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub enum PlayerEvent {
    Input(String),
    InputClosed,
    Tick(TimerId),
}

/// How a playback run ended
#[derive(Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished,
    Exited,
}

/// Repeating one-second tick bound to a single countdown
pub struct Ticker {
    cancelled: Arc<AtomicBool>,
}

impl Ticker {
    pub fn spawn(timer: TimerId, interval: Duration, tx: Sender<PlayerEvent>) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(PlayerEvent::Tick(timer)).is_err() {
                break;
            }
        });

        Self { cancelled }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

fn spawn_input_reader(tx: Sender<PlayerEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(PlayerEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(PlayerEvent::InputClosed);
    });
}

/// Play today's session interactively. Enter advances, `x` exits.
pub fn play_interactive<S: KeyValueStore>(
    trainer: &mut Trainer<S>,
    today: DayIndex,
    tick_interval: Duration,
) -> Result<PlayOutcome> {
    let (tx, rx) = channel::<PlayerEvent>();

    let timer = trainer.start(today)?;
    let mut ticker = timer.map(|id| Ticker::spawn(id, tick_interval, tx.clone()));
    if let Some(playback) = trainer.playback() {
        println!("\n{}", playback.session().title);
        render::render_step(playback);
    }

    spawn_input_reader(tx.clone());

    while let Ok(event) = rx.recv() {
        match event {
            PlayerEvent::Tick(id) => {
                if let Some(remaining) = trainer.tick(id) {
                    print!("\r  Time: {}s   ", remaining);
                    io::stdout().flush()?;
                }
            }
            PlayerEvent::Input(line) if line.trim().eq_ignore_ascii_case("x") => {
                drop(ticker.take());
                trainer.exit();
                println!("\nExited. Nothing was recorded.");
                return Ok(PlayOutcome::Exited);
            }
            PlayerEvent::Input(_) => {
                // Cancel before the step changes so no tick outlives its step
                drop(ticker.take());
                match trainer.advance(today)? {
                    StepAdvance::Step { timer, .. } => {
                        ticker = timer.map(|id| Ticker::spawn(id, tick_interval, tx.clone()));
                        if let Some(playback) = trainer.playback() {
                            render::render_step(playback);
                        }
                    }
                    StepAdvance::Finished(completion) => {
                        render::render_completion(&completion);
                        return Ok(PlayOutcome::Finished);
                    }
                }
            }
            PlayerEvent::InputClosed => break,
        }
    }

    drop(ticker);
    trainer.exit();
    println!("\nInput closed. Nothing was recorded.");
    Ok(PlayOutcome::Exited)
}

/// Advance through every step without waiting for input.
pub fn play_auto<S: KeyValueStore>(
    trainer: &mut Trainer<S>,
    today: DayIndex,
) -> Result<PlayOutcome> {
    trainer.start(today)?;
    if let Some(playback) = trainer.playback() {
        println!("\n{}", playback.session().title);
        render::render_step(playback);
    }

    loop {
        match trainer.advance(today)? {
            StepAdvance::Step { .. } => {
                if let Some(playback) = trainer.playback() {
                    render::render_step(playback);
                }
            }
            StepAdvance::Finished(completion) => {
                render::render_completion(&completion);
                return Ok(PlayOutcome::Finished);
            }
        }
    }
}
