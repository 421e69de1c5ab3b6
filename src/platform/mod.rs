/*!
 * Platform Layer
 *
 * Thread identity, console bring-up, interrupt-signal registration, and the
 * stateless capability queries embedders use for feature gating. Everything
 * here is either constant or a thin wrapper over the OS.
 */

use crate::core::types::ThreadId;
use serde::{Deserialize, Serialize};
use std::os::raw::c_int;

/// Signal-handler entry point type for the interrupt trampoline.
pub(crate) type SignalTrampoline = extern "C" fn(c_int);

/// Identity of the calling OS thread.
#[cfg(unix)]
#[must_use]
pub fn current_thread_id() -> ThreadId {
    // pthread_t is numeric on every supported unix
    unsafe { libc::pthread_self() as ThreadId }
}

/// Identity of the calling OS thread.
///
/// Without pthreads the id is a process-unique counter handed out on first
/// use per thread.
#[cfg(not(unix))]
#[must_use]
pub fn current_thread_id() -> ThreadId {
    use std::cell::Cell;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static THREAD_ID: Cell<ThreadId> = const { Cell::new(0) };
    }
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}

/// Prepare console output for the process. Unix consoles need no setup; the
/// hook exists for platforms that do and so first-runtime bring-up has a
/// single place to call.
pub(crate) fn console_init() {
    log::debug!("Console ready");
}

/// Route the process interrupt signal (SIGUSR1) to `trampoline`.
///
/// Replaces any previous disposition for the signal. Failure is logged and
/// otherwise ignored: interrupts are advisory, and a host that sandboxes
/// signal registration still gets a working runtime.
#[cfg(unix)]
pub(crate) fn install_interrupt_signal(trampoline: SignalTrampoline) {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    let action = SigAction::new(
        SigHandler::Handler(trampoline),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    match unsafe { sigaction(Signal::SIGUSR1, &action) } {
        Ok(_) => log::debug!("Interrupt trampoline installed on SIGUSR1"),
        Err(err) => log::warn!("Failed to install interrupt trampoline: {err}"),
    }
}

#[cfg(not(unix))]
pub(crate) fn install_interrupt_signal(_trampoline: SignalTrampoline) {
    log::debug!("Interrupt signal delivery not available on this platform");
}

/// Operating-system family of the compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Macos,
    Ios,
    Linux,
    Windows,
    Android,
    Wasm,
    Unknown,
}

/// CPU architecture of the compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuArchitecture {
    Arm32,
    Arm64,
    X86,
    X64,
    Wasm32,
    Unknown,
}

#[must_use]
pub const fn os_family() -> OsFamily {
    if cfg!(target_os = "macos") {
        OsFamily::Macos
    } else if cfg!(target_os = "ios") {
        OsFamily::Ios
    } else if cfg!(target_os = "android") {
        OsFamily::Android
    } else if cfg!(target_os = "linux") {
        OsFamily::Linux
    } else if cfg!(target_os = "windows") {
        OsFamily::Windows
    } else if cfg!(target_family = "wasm") {
        OsFamily::Wasm
    } else {
        OsFamily::Unknown
    }
}

#[must_use]
pub const fn cpu_architecture() -> CpuArchitecture {
    if cfg!(target_arch = "arm") {
        CpuArchitecture::Arm32
    } else if cfg!(target_arch = "aarch64") {
        CpuArchitecture::Arm64
    } else if cfg!(target_arch = "x86") {
        CpuArchitecture::X86
    } else if cfg!(target_arch = "x86_64") {
        CpuArchitecture::X64
    } else if cfg!(target_arch = "wasm32") {
        CpuArchitecture::Wasm32
    } else {
        CpuArchitecture::Unknown
    }
}

#[must_use]
pub const fn is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

/// Whether unaligned loads and stores are safe on this target.
#[must_use]
pub const fn can_access_unaligned() -> bool {
    cfg!(any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "aarch64"
    ))
}
