// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signals delivered to worker processes.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// The signals the supervisor sends, by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSignal {
    /// Periodic nudge to a solver (`SIGUSR1`).
    Keepalive,
    /// Graceful stop at the soft deadline (`SIGINT`).
    Interrupt,
    /// Sent once the output stream has closed (`SIGTERM`).
    Terminate,
    /// Forceful stop at the hard deadline (`SIGKILL`).
    Kill,
}

foreman_core::simple_display! {
    WorkerSignal {
        Keepalive => "keepalive",
        Interrupt => "interrupt",
        Terminate => "terminate",
        Kill => "kill",
    }
}

impl WorkerSignal {
    pub fn as_nix(self) -> Signal {
        match self {
            WorkerSignal::Keepalive => Signal::SIGUSR1,
            WorkerSignal::Interrupt => Signal::SIGINT,
            WorkerSignal::Terminate => Signal::SIGTERM,
            WorkerSignal::Kill => Signal::SIGKILL,
        }
    }
}

/// Deliver `signal` to the process `pid`.
pub fn send(pid: u32, signal: WorkerSignal) -> Result<(), Errno> {
    let raw = i32::try_from(pid).map_err(|_| Errno::EINVAL)?;
    kill(Pid::from_raw(raw), signal.as_nix())
}

/// True when delivery failed only because the process no longer exists.
pub fn is_gone(err: Errno) -> bool {
    err == Errno::ESRCH
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
