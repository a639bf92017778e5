pub mod settings;

use std::path::Path;

use anyhow::{Context, Result, bail};
use aya::Ebpf;
use log::{info, warn};
use tokio::signal;

use crate::settings::Settings;

pub mod probes;
use crate::probes::{
    Probe,
    builtin::{ExecTraceProbe, FlowClassifyProbe},
};

pub struct TracemarkEngine {
    pub settings: Settings,
    bpf: Ebpf,
}

impl TracemarkEngine {
    /// Loads the embedded eBPF object. Rejection by the kernel verifier
    /// surfaces here or at attach time, never while a probe is running.
    pub fn new(settings: Settings, bytecode: &[u8]) -> Result<Self> {
        bump_memlock_rlimit()?;
        let bpf = Ebpf::load(bytecode).context("Failed to load eBPF object")?;
        Ok(Self { settings, bpf })
    }

    /// Loads an eBPF object from a file instead of the embedded bytecode.
    pub fn from_object_file(settings: Settings, path: &Path) -> Result<Self> {
        bump_memlock_rlimit()?;
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read eBPF object {}", path.display()))?;
        let bpf = Ebpf::load(&data)
            .with_context(|| format!("Failed to load eBPF object {}", path.display()))?;
        Ok(Self { settings, bpf })
    }

    /// Attaches the configured probes and parks until Ctrl-C. Probes detach
    /// when the loaded object is dropped on return.
    pub async fn run(mut self) -> Result<()> {
        let attached = self.attach_probes()?;
        if attached == 0 {
            bail!("No probes attached; nothing to trace");
        }

        info!("{attached} probe(s) active. Press Ctrl-C to exit.");
        signal::ctrl_c().await?;
        info!("Exiting...");

        Ok(())
    }

    fn attach_probes(&mut self) -> Result<usize> {
        let mut attached = 0;

        if self.settings.exec_trace_enabled() && ExecTraceProbe.attach(&mut self.bpf)? {
            attached += 1;
        }

        if self.settings.flow_classify_enabled() && FlowClassifyProbe.attach(&mut self.bpf)? {
            attached += 1;
        }

        Ok(attached)
    }
}

fn bump_memlock_rlimit() -> Result<()> {
    // eBPF programs are stored in locked kernel memory (can't be swapped to disk).
    // - `RLIMIT_MEMLOCK` - resource limit for locked-in-memory pages
    // - `RLIM_INFINITY` - removes the limit
    let rlim = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
    if ret != 0 {
        warn!("Failed to increase rlimit");
    }
    Ok(())
}
