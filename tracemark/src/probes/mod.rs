use std::path::Path;

use anyhow::{Context, Result};
use aya::{
    Ebpf,
    programs::{KProbe, TracePoint},
};
use log::{info, warn};

pub mod builtin;
pub mod descriptor;

pub use descriptor::{AttachPoint, ProbeDescriptor};

/// A probe that can bind itself into a loaded eBPF object.
///
/// `Ok(true)` means the program is attached and live. `Ok(false)` means the
/// attach point does not exist on this kernel and the probe was skipped.
/// `Err` is a load-time rejection: missing program, wrong program type, or
/// the in-kernel verifier refusing the bytecode.
pub trait Probe {
    fn descriptor(&self) -> Result<ProbeDescriptor>;

    fn attach(&self, bpf: &mut Ebpf) -> Result<bool> {
        let descriptor = self.descriptor()?;
        attach_descriptor(bpf, &descriptor)
    }
}

fn tracepoint_exists(category: &str, name: &str) -> bool {
    const TRACEFS_MOUNT_POINTS: [&str; 2] = ["/sys/kernel/tracing", "/sys/kernel/debug/tracing"];

    TRACEFS_MOUNT_POINTS.iter().any(|base| {
        Path::new(base)
            .join("events")
            .join(category)
            .join(name)
            .exists()
    })
}

/// Loads the descriptor's program and attaches it to its hook.
pub fn attach_descriptor(bpf: &mut Ebpf, descriptor: &ProbeDescriptor) -> Result<bool> {
    match &descriptor.attach_point {
        AttachPoint::Tracepoint { category, name } => {
            if !tracepoint_exists(category, name) {
                warn!(
                    "Tracepoint {}:{} not available; skipping {}",
                    category, name, descriptor.program
                );
                return Ok(false);
            }

            info!("Loading program {}", descriptor.program);
            let program: &mut TracePoint = bpf
                .program_mut(&descriptor.program)
                .with_context(|| format!("Failed to find {} program", descriptor.program))?
                .try_into()
                .context("Program is not a TracePoint")?;
            program.load()?;
            program
                .attach(category, name)
                .with_context(|| format!("Failed to attach {}", descriptor.attach_point))?;
        }
        AttachPoint::Kprobe { symbol } | AttachPoint::Kretprobe { symbol } => {
            info!("Loading program {}", descriptor.program);
            let program: &mut KProbe = bpf
                .program_mut(&descriptor.program)
                .with_context(|| format!("Failed to find {} program", descriptor.program))?
                .try_into()
                .context("Program is not a KProbe")?;
            program.load()?;
            program
                .attach(symbol, 0)
                .with_context(|| format!("Failed to attach {}", descriptor.attach_point))?;
        }
    }

    info!("Attached {}", descriptor.attach_point);
    Ok(true)
}
