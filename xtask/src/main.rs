use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build and package tracemark")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the complete binary (eBPF + userspace)
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,

        /// Target architecture for cross-compilation (e.g., x86_64-unknown-linux-gnu, aarch64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },

    /// Package binary for distribution
    Package {
        /// Target architecture
        #[arg(long)]
        target: Option<String>,

        /// Output directory
        #[arg(long, default_value = "dist")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { release, target } => {
            build(release, target.as_deref())?;
        }
        Commands::Package { target, output } => {
            package(target.as_deref(), &output)?;
        }
    }

    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn binary_path(root: &Path, release: bool, target: Option<&str>) -> PathBuf {
    let profile = if release { "release" } else { "debug" };
    match target {
        Some(t) => root.join("target").join(t).join(profile).join("tracemark"),
        None => root.join("target").join(profile).join("tracemark"),
    }
}

fn build(release: bool, target: Option<&str>) -> Result<()> {
    let root = project_root();

    println!("🔨 Building tracemark...");

    // Determine if we need cross-compilation (Linux target from non-Linux host)
    let is_cross_compile =
        target.map(|t| t.contains("linux")).unwrap_or(false) && !cfg!(target_os = "linux");

    let build_cmd = if is_cross_compile {
        // Check if cross is available
        if which::which("cross").is_ok() {
            println!("   Using 'cross' for cross-compilation");
            "cross"
        } else {
            bail!(
                "Cross-compilation to Linux requires 'cross' tool.\n\
                 Install with: cargo install cross\n\
                 Also requires Docker to be running."
            );
        }
    } else {
        "cargo"
    };

    let mut cmd = Command::new(build_cmd);
    cmd.current_dir(&root);
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    if let Some(t) = target {
        cmd.arg("--target").arg(t);
        println!("   Target: {}", t);
    }

    cmd.arg("-p").arg("tracemark");

    let status = cmd.status().context("Failed to run cargo build")?;

    if !status.success() {
        bail!("Build failed");
    }

    println!(
        "✅ Build complete: {}",
        binary_path(&root, release, target).display()
    );

    Ok(())
}

fn package(target: Option<&str>, output_dir: &str) -> Result<()> {
    // Build release
    build(true, target)?;

    let root = project_root();
    let output_path = root.join(output_dir);

    fs::create_dir_all(&output_path).context("Failed to create output directory")?;

    let binary = binary_path(&root, true, target);
    if !binary.exists() {
        bail!("Binary not found at: {}", binary.display());
    }

    // Determine package name
    let arch = target.unwrap_or(std::env::consts::ARCH);
    let version = env!("CARGO_PKG_VERSION");
    let package_name = format!("tracemark-{}-{}", version, arch);

    let package_dir = output_path.join(&package_name);
    fs::create_dir_all(&package_dir)?;

    // Copy binary
    fs::copy(&binary, package_dir.join("tracemark"))?;

    // Copy example.env
    let env_example = root.join("example.env");
    if env_example.exists() {
        fs::copy(&env_example, package_dir.join("tracemark.env.example"))?;
    }

    // Generate install script
    let install_script = r#"#!/bin/bash
set -e

INSTALL_DIR="${INSTALL_DIR:-/usr/local/bin}"
CONFIG_DIR="${CONFIG_DIR:-/etc/tracemark}"

echo "Installing tracemark..."

# Install binary
sudo install -m 755 tracemark "$INSTALL_DIR/tracemark"

# Install config
sudo mkdir -p "$CONFIG_DIR"
if [ -f tracemark.env.example ]; then
    sudo cp tracemark.env.example "$CONFIG_DIR/tracemark.env.example"
    if [ ! -f "$CONFIG_DIR/tracemark.env" ]; then
        sudo cp tracemark.env.example "$CONFIG_DIR/tracemark.env"
    fi
fi

echo "✅ Installed to $INSTALL_DIR/tracemark"
echo ""
echo "Attaching probes needs CAP_BPF/CAP_SYS_ADMIN; run with sudo."
"#;

    fs::write(package_dir.join("install.sh"), install_script)?;

    // Create tarball
    let tarball = output_path.join(format!("{}.tar.gz", package_name));

    let status = Command::new("tar")
        .current_dir(&output_path)
        .args(["-czf", &tarball.to_string_lossy(), &package_name])
        .status()
        .context("Failed to create tarball")?;

    if !status.success() {
        bail!("Failed to create tarball");
    }

    // Cleanup directory
    fs::remove_dir_all(&package_dir)?;

    println!("✅ Package created: {}", tarball.display());

    Ok(())
}
