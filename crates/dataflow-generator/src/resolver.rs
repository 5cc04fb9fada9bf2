//! Tool availability resolution and bootstrap.
//!
//! The generator tool is launched through `uvx`. This module decides, per
//! process, how to run it: find `uvx` on the host, install it through an
//! ordered chain of OS-appropriate bootstrap strategies, or fall back to
//! re-invoking the Python runtime as `python -m uv tool run`. Resolution
//! never fails outright; a descriptor that turns out to be unrunnable
//! surfaces as an error at invocation time, not here.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

/// Command name the resolver looks for on the host.
pub const PRIMARY_COMMAND: &str = "uvx";

/// Package identifier of the generator tool, passed to `--from`.
pub const TOOL_PACKAGE_ID: &str = "data-flow-generator";

/// Subcommand of the generator tool.
pub const TOOL_SUBCOMMAND: &str = "data-flow";

/// Environment variable overriding the `uvx` location.
pub const UVX_PATH_ENV: &str = "DATAFLOW_UVX_PATH";

/// The resolved means of running the generator tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationDescriptor {
    /// A standalone executable, resolved to a concrete path.
    Command(PathBuf),
    /// An indirect launcher: a fixed argv prefix that reaches the tool
    /// through another runtime (e.g. `python3 -m uv tool run`).
    Launcher(Vec<String>),
}

impl InvocationDescriptor {
    /// Returns the argv prefix this descriptor contributes to an
    /// invocation.
    pub fn argv_prefix(&self) -> Vec<String> {
        match self {
            InvocationDescriptor::Command(path) => {
                vec![path.to_string_lossy().into_owned()]
            }
            InvocationDescriptor::Launcher(argv) => argv.clone(),
        }
    }
}

/// Outcome of a resolution pass: the descriptor to use plus a record of
/// every bootstrap fallback that was attempted along the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// How to run the tool.
    pub descriptor: InvocationDescriptor,
    /// Human-readable summary of attempted bootstrap steps, in order.
    /// Empty when the command was found directly.
    pub attempts: Vec<String>,
}

/// Configuration for the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Explicit path to the `uvx` executable, checked first.
    pub uvx_path: Option<PathBuf>,
    /// Directory bootstrap installers target. Defaults to
    /// `<data_local_dir>/dataflow/uv`.
    pub install_root: Option<PathBuf>,
    /// Whether to attempt installation when the command is missing.
    /// Disabled in tests and by `doctor` (report-only).
    pub bootstrap: bool,
    /// Argv prefix used for the indirect-launcher fallback. Defaults to
    /// re-invoking the host's Python with uv as a module; override it to
    /// pin a specific interpreter.
    pub launcher: Option<Vec<String>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            uvx_path: None,
            install_root: None,
            bootstrap: true,
            launcher: None,
        }
    }
}

impl ResolverConfig {
    /// Sets an explicit `uvx` path.
    pub fn uvx_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.uvx_path = Some(path.into());
        self
    }

    /// Sets the install root for bootstrap installers.
    pub fn install_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_root = Some(path.into());
        self
    }

    /// Enables or disables bootstrap installation.
    pub fn bootstrap(mut self, enabled: bool) -> Self {
        self.bootstrap = enabled;
        self
    }

    /// Sets the argv prefix for the indirect-launcher fallback.
    pub fn launcher(mut self, argv: Vec<String>) -> Self {
        self.launcher = Some(argv);
        self
    }
}

/// A single bootstrap strategy: a label for reporting and the command that
/// runs it.
#[derive(Debug, Clone)]
struct BootstrapStep {
    label: &'static str,
    program: &'static str,
    args: Vec<String>,
}

/// The tool availability resolver.
///
/// Memoizes its result; every request reuses the first resolution until
/// [`Resolver::invalidate`] is called (done by the subprocess adapter when
/// a spawn comes back "command not found").
pub struct Resolver {
    config: ResolverConfig,
    cache: Mutex<Option<Resolution>>,
}

impl Resolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with the given configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(None),
        }
    }

    /// Returns the memoized resolution, computing it on first use.
    pub fn resolve(&self) -> Resolution {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(resolution) = cache.as_ref() {
            return resolution.clone();
        }
        let resolution = self.resolve_fresh();
        *cache = Some(resolution.clone());
        resolution
    }

    /// Drops the memoized resolution so the next call re-runs discovery.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }

    /// Runs a full resolution pass. Infallible: when nothing can be found
    /// or installed, the indirect launcher is returned and failure is left
    /// to invocation time.
    fn resolve_fresh(&self) -> Resolution {
        if let Some(path) = self.find_uvx() {
            return Resolution {
                descriptor: InvocationDescriptor::Command(path),
                attempts: Vec::new(),
            };
        }

        let mut attempts = Vec::new();

        if self.config.bootstrap {
            let install_root = self.install_root();
            if let Err(e) = std::fs::create_dir_all(&install_root) {
                attempts.push(format!(
                    "create install root {}: {e}",
                    install_root.display()
                ));
            }

            for step in bootstrap_steps(&install_root) {
                eprintln!("dataflow: {} not found, trying {}", PRIMARY_COMMAND, step.label);
                let outcome = run_bootstrap_step(&step);
                attempts.push(format!("{}: {}", step.label, outcome));

                if let Some(path) = self.find_uvx() {
                    eprintln!(
                        "dataflow: installed {} via {} at {}",
                        PRIMARY_COMMAND,
                        step.label,
                        path.display()
                    );
                    return Resolution {
                        descriptor: InvocationDescriptor::Command(path),
                        attempts,
                    };
                }
            }
        }

        // Even with no standalone uvx, the uv library may be importable by
        // the host's Python. Let the spawn decide.
        eprintln!(
            "dataflow: {} unavailable, falling back to indirect launcher",
            PRIMARY_COMMAND
        );
        attempts.push("indirect python launcher".to_string());
        let argv = self
            .config
            .launcher
            .clone()
            .unwrap_or_else(indirect_launcher);
        Resolution {
            descriptor: InvocationDescriptor::Launcher(argv),
            attempts,
        }
    }

    /// Looks for an existing `uvx` without side effects.
    pub fn find_uvx(&self) -> Option<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.uvx_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        // Check environment override
        if let Ok(path) = std::env::var(UVX_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // Try PATH
        for name in uvx_candidates() {
            if let Ok(path) = which::which(name) {
                return Some(path);
            }
        }

        // Try the managed install root
        let root = self.install_root();
        for name in uvx_candidates() {
            for candidate in [root.join(name), root.join("bin").join(name)] {
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }

        None
    }

    fn install_root(&self) -> PathBuf {
        if let Some(ref root) = self.config.install_root {
            return root.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("dataflow")
            .join("uv")
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn uvx_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["uvx.exe", "uvx"]
    } else {
        &["uvx"]
    }
}

/// The indirect-launcher argv: re-invoke Python with uv as a module.
/// `python -m uv tool run` is the module-mode spelling of `uvx`.
fn indirect_launcher() -> Vec<String> {
    let python = if cfg!(windows) { "python" } else { "python3" };
    vec![
        python.to_string(),
        "-m".to_string(),
        "uv".to_string(),
        "tool".to_string(),
        "run".to_string(),
    ]
}

/// Ordered bootstrap strategies for the current OS.
fn bootstrap_steps(install_root: &Path) -> Vec<BootstrapStep> {
    let mut steps = Vec::new();

    if cfg!(windows) {
        steps.push(BootstrapStep {
            label: "powershell install script",
            program: "cmd",
            args: vec![
                "/C".to_string(),
                format!(
                    "cd {} ; powershell -ExecutionPolicy ByPass -c \"irm https://astral.sh/uv/install.ps1 | iex\"",
                    install_root.display()
                ),
            ],
        });
        steps.push(BootstrapStep {
            label: "winget install",
            program: "winget",
            args: vec![
                "install".to_string(),
                "--id".to_string(),
                "astral-sh.uv".to_string(),
                "-e".to_string(),
            ],
        });
    } else {
        steps.push(BootstrapStep {
            label: "curl install script",
            program: "sh",
            args: vec![
                "-c".to_string(),
                format!(
                    "cd {} && curl -LsSf https://astral.sh/uv/install.sh | sh",
                    install_root.display()
                ),
            ],
        });
        steps.push(BootstrapStep {
            label: "wget install script",
            program: "sh",
            args: vec![
                "-c".to_string(),
                format!(
                    "cd {} && wget -qO- https://astral.sh/uv/install.sh | sh",
                    install_root.display()
                ),
            ],
        });
    }

    steps.push(BootstrapStep {
        label: "cargo install",
        program: "cargo",
        args: vec![
            "install".to_string(),
            "--git".to_string(),
            "https://github.com/astral-sh/uv".to_string(),
            "uv".to_string(),
            "--root".to_string(),
            install_root.display().to_string(),
        ],
    });

    steps
}

/// Runs one bootstrap step and describes its outcome. Installer failures
/// are swallowed; the caller just advances to the next strategy.
fn run_bootstrap_step(step: &BootstrapStep) -> String {
    match Command::new(step.program).args(&step.args).status() {
        Ok(status) if status.success() => "succeeded".to_string(),
        Ok(status) => format!("exited with {status}"),
        Err(e) => format!("could not start: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_bootstrap_config(dir: &Path) -> ResolverConfig {
        // Point every probe location at an empty temp dir so the host's
        // real uvx (if any) cannot leak into the test.
        ResolverConfig::default()
            .install_root(dir)
            .bootstrap(false)
    }

    #[test]
    fn test_config_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("uvx");
        std::fs::write(&fake, "").unwrap();

        let resolver = Resolver::with_config(
            no_bootstrap_config(dir.path()).uvx_path(&fake),
        );
        let resolution = resolver.resolve();
        assert_eq!(
            resolution.descriptor,
            InvocationDescriptor::Command(fake)
        );
        // Bootstrap is lazy: nothing was attempted.
        assert!(resolution.attempts.is_empty());
    }

    #[test]
    fn test_managed_install_root_is_probed() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let fake = bin.join(uvx_candidates()[0]);
        std::fs::write(&fake, "").unwrap();

        let resolver = Resolver::with_config(no_bootstrap_config(dir.path()));
        if which::which(PRIMARY_COMMAND).is_ok() {
            // A real uvx on PATH takes precedence; the probe order is
            // covered by the override test above.
            return;
        }
        assert_eq!(
            resolver.resolve().descriptor,
            InvocationDescriptor::Command(fake)
        );
    }

    #[test]
    fn test_missing_command_falls_back_to_launcher() {
        let dir = tempfile::tempdir().unwrap();
        if which::which(PRIMARY_COMMAND).is_ok() {
            return;
        }

        let resolver = Resolver::with_config(no_bootstrap_config(dir.path()));
        let resolution = resolver.resolve();
        match resolution.descriptor {
            InvocationDescriptor::Launcher(argv) => {
                assert!(argv.contains(&"-m".to_string()));
                assert!(argv.contains(&"uv".to_string()));
            }
            other => panic!("expected launcher fallback, got {other:?}"),
        }
        assert!(!resolution.attempts.is_empty());
    }

    #[test]
    fn test_launcher_override_replaces_default_fallback() {
        let dir = tempfile::tempdir().unwrap();
        if which::which(PRIMARY_COMMAND).is_ok() {
            return;
        }

        let resolver = Resolver::with_config(
            no_bootstrap_config(dir.path())
                .launcher(vec!["/opt/python3.12".to_string(), "-m".to_string()]),
        );
        assert_eq!(
            resolver.resolve().descriptor,
            InvocationDescriptor::Launcher(vec![
                "/opt/python3.12".to_string(),
                "-m".to_string()
            ])
        );
    }

    #[test]
    fn test_resolution_is_memoized_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("uvx");
        std::fs::write(&fake, "").unwrap();

        let resolver = Resolver::with_config(
            no_bootstrap_config(dir.path()).uvx_path(&fake),
        );
        let first = resolver.resolve();

        // The file disappears, but the memoized descriptor survives.
        std::fs::remove_file(&fake).unwrap();
        assert_eq!(resolver.resolve().descriptor, first.descriptor);

        // After invalidation the resolver re-runs discovery.
        resolver.invalidate();
        assert_ne!(resolver.resolve().descriptor, first.descriptor);
    }

    #[test]
    fn test_bootstrap_step_order() {
        let steps = bootstrap_steps(Path::new("/tmp/uv"));
        let labels: Vec<&str> = steps.iter().map(|s| s.label).collect();
        if cfg!(windows) {
            assert_eq!(
                labels,
                ["powershell install script", "winget install", "cargo install"]
            );
        } else {
            assert_eq!(
                labels,
                ["curl install script", "wget install script", "cargo install"]
            );
        }
    }

    #[test]
    fn test_launcher_argv_prefix() {
        let descriptor = InvocationDescriptor::Launcher(vec![
            "python3".to_string(),
            "-m".to_string(),
            "uv".to_string(),
        ]);
        assert_eq!(descriptor.argv_prefix(), ["python3", "-m", "uv"]);

        let descriptor = InvocationDescriptor::Command(PathBuf::from("/usr/bin/uvx"));
        assert_eq!(descriptor.argv_prefix(), ["/usr/bin/uvx"]);
    }
}
