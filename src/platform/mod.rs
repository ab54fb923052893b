// ABOUTME: Locates steamcmd and its configuration directory per operating system.
// ABOUTME: One ToolLocator implementation per platform, selected once at startup.

mod error;

pub use error::{LocateError, LocateErrorKind};

use error::{ExecutableNotFoundSnafu, HomeNotSetSnafu, UnsupportedPlatformSnafu};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported build agent platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// Platform this binary is running on.
    pub fn current() -> Result<Self, LocateError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a supported platform.
    pub fn from_os(os: &str) -> Result<Self, LocateError> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            other => UnsupportedPlatformSnafu { os: other }.fail(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// Where steamcmd lives and where it keeps its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    pub executable: PathBuf,
    pub config_dir: PathBuf,
}

impl ToolLocation {
    /// Session config file (`config/config.vdf`).
    pub fn session_config_path(&self) -> PathBuf {
        self.config_dir.join("config").join("config.vdf")
    }

    /// Directory steamcmd writes its logs into.
    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("Logs")
    }
}

/// Process environment consulted while searching.
#[derive(Debug, Clone, Default)]
pub struct SearchEnv {
    /// Value of `PATH`.
    pub path: Option<OsString>,
    /// The user's home directory.
    pub home: Option<PathBuf>,
}

impl SearchEnv {
    /// Read `PATH` and the home directory from the current process.
    pub fn from_process() -> Self {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        Self {
            path: std::env::var_os("PATH"),
            home,
        }
    }

    /// First `PATH` entry containing a file called `name`.
    fn find_on_path(&self, name: &str, searched: &mut Vec<PathBuf>) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        std::env::split_paths(path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(name))
            .find(|candidate| {
                searched.push(candidate.clone());
                candidate.is_file()
            })
    }

    fn home(&self) -> Result<&Path, LocateError> {
        self.home.as_deref().ok_or_else(|| HomeNotSetSnafu.build())
    }
}

/// Resolves steamcmd for one platform.
pub trait ToolLocator: Send + Sync {
    fn platform(&self) -> Platform;

    /// Find steamcmd, honouring an explicit Steam directory when given.
    fn locate(&self, steam_dir: Option<&Path>) -> Result<ToolLocation, LocateError>;
}

/// Select the locator for `platform`.
pub fn locator_for(platform: Platform, env: SearchEnv) -> Box<dyn ToolLocator> {
    match platform {
        Platform::Linux => Box::new(LinuxLocator { env }),
        Platform::MacOs => Box::new(MacLocator { env }),
        Platform::Windows => Box::new(WindowsLocator { env }),
    }
}

/// Try `candidates` in order, recording each in `searched`.
fn first_file(candidates: &[PathBuf], searched: &mut Vec<PathBuf>) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|c| {
            searched.push((*c).clone());
            c.is_file()
        })
        .cloned()
}

/// Shared search for the unix layouts, which differ only in paths.
fn locate_unix(
    env: &SearchEnv,
    steam_dir: Option<&Path>,
    builder_path: &str,
    default_config_dir: impl Fn(&Path) -> PathBuf,
) -> Result<ToolLocation, LocateError> {
    let mut searched = Vec::new();

    if let Some(dir) = steam_dir {
        let candidates = [dir.join(builder_path), dir.join("steamcmd.sh")];
        let executable = first_file(&candidates, &mut searched)
            .or_else(|| env.find_on_path("steamcmd", &mut searched));
        return match executable {
            Some(executable) => Ok(ToolLocation {
                executable,
                config_dir: dir.to_path_buf(),
            }),
            None => ExecutableNotFoundSnafu { searched }.fail(),
        };
    }

    if let Some(executable) = env.find_on_path("steamcmd", &mut searched) {
        let config_dir = default_config_dir(env.home()?);
        return Ok(ToolLocation {
            executable,
            config_dir,
        });
    }

    let config_dir = default_config_dir(env.home()?);
    match first_file(&[config_dir.join("steamcmd.sh")], &mut searched) {
        Some(executable) => Ok(ToolLocation {
            executable,
            config_dir,
        }),
        None => ExecutableNotFoundSnafu { searched }.fail(),
    }
}

#[derive(Debug, Clone)]
pub struct LinuxLocator {
    env: SearchEnv,
}

impl ToolLocator for LinuxLocator {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn locate(&self, steam_dir: Option<&Path>) -> Result<ToolLocation, LocateError> {
        locate_unix(
            &self.env,
            steam_dir,
            "tools/ContentBuilder/builder_linux/steamcmd.sh",
            |home| home.join("Steam"),
        )
    }
}

#[derive(Debug, Clone)]
pub struct MacLocator {
    env: SearchEnv,
}

impl ToolLocator for MacLocator {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn locate(&self, steam_dir: Option<&Path>) -> Result<ToolLocation, LocateError> {
        locate_unix(
            &self.env,
            steam_dir,
            "tools/ContentBuilder/builder_osx/steamcmd.sh",
            |home| {
                home.join("Library")
                    .join("Application Support")
                    .join("Steam")
            },
        )
    }
}

/// On Windows steamcmd keeps its state next to the executable.
#[derive(Debug, Clone)]
pub struct WindowsLocator {
    env: SearchEnv,
}

impl ToolLocator for WindowsLocator {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn locate(&self, steam_dir: Option<&Path>) -> Result<ToolLocation, LocateError> {
        let mut searched = Vec::new();

        if let Some(dir) = steam_dir {
            let candidates = [
                dir.join("tools/ContentBuilder/builder/steamcmd.exe"),
                dir.join("steamcmd.exe"),
            ];
            let executable = first_file(&candidates, &mut searched)
                .or_else(|| self.env.find_on_path("steamcmd.exe", &mut searched));
            return match executable {
                Some(executable) => Ok(ToolLocation {
                    executable,
                    config_dir: dir.to_path_buf(),
                }),
                None => ExecutableNotFoundSnafu { searched }.fail(),
            };
        }

        let executable = match self.env.find_on_path("steamcmd.exe", &mut searched) {
            Some(found) => found,
            None => {
                let fallback = self.env.home()?.join("steamcmd").join("steamcmd.exe");
                first_file(&[fallback], &mut searched)
                    .ok_or_else(|| ExecutableNotFoundSnafu { searched }.build())?
            }
        };
        let config_dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(ToolLocation {
            executable,
            config_dir,
        })
    }
}
