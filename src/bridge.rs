//! Optional assistant bridge
//!
//! Prompts can be handed to an external assistant that may or may not be
//! installed. Assistants are registered by name in a [`CapabilityRegistry`];
//! the [`AssistantBridge`] looks one up on every call and turns every failure
//! (missing, unavailable, error, panic, unexpected reply) into `false`.

use std::collections::HashMap;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use serde_json::Value;

use crate::error::BridgeError;

/// Name the bridge looks up by default
pub const DEFAULT_CAPABILITY: &str = "assistant";

/// Something that can receive a prompt
pub trait Capability: Send + Sync {
    /// Whether the capability can be invoked right now
    fn is_ready(&self) -> bool;

    /// Hand over a prompt. Only `Value::Bool(true)` counts as accepted.
    fn invoke(&self, prompt: &str) -> Result<Value, BridgeError>;
}

/// Named capabilities
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    entries: HashMap<String, Arc<dyn Capability>>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry").field("names", &self.names()).finish()
    }
}

impl CapabilityRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a capability
    pub fn register(&mut self, name: impl Into<String>, capability: Arc<dyn Capability>) {
        self.entries.insert(name.into(), capability);
    }

    /// Remove a capability; returns whether it was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Find a capability by name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.entries.get(name).cloned()
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Defensive front for one named capability
#[derive(Debug, Clone)]
pub struct AssistantBridge {
    registry: CapabilityRegistry,
    name: String,
}

impl AssistantBridge {
    /// Bridge to the capability called `name`
    #[must_use]
    pub fn new(registry: CapabilityRegistry, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
        }
    }

    /// Capability name this bridge targets
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the assistant can take a prompt; checked fresh on every call
    #[must_use]
    pub fn is_available(&self) -> bool {
        let Some(capability) = self.registry.lookup(&self.name) else {
            return false;
        };
        panic::catch_unwind(AssertUnwindSafe(|| capability.is_ready())).unwrap_or_else(|_| {
            log::warn!("probing {} panicked", self.name);
            false
        })
    }

    /// Send a prompt; `true` only if the assistant accepted it
    #[must_use]
    pub fn send_prompt(&self, text: &str) -> bool {
        let Some(capability) = self.registry.lookup(&self.name) else {
            log::debug!("no capability registered as {}", self.name);
            return false;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if !capability.is_ready() {
                return Err(BridgeError::Unavailable(self.name.clone()));
            }
            capability.invoke(text)
        }));

        match outcome {
            Ok(Ok(Value::Bool(true))) => true,
            Ok(Ok(other)) => {
                log::warn!("{} did not accept the prompt (replied {other})", self.name);
                false
            },
            Ok(Err(err)) => {
                log::warn!("failed to send prompt to {}: {err}", self.name);
                false
            },
            Err(_) => {
                log::warn!("sending prompt to {} panicked", self.name);
                false
            },
        }
    }
}

/// Assistant reached by piping the prompt into an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCapability {
    program: String,
    args: Vec<String>,
}

impl CommandCapability {
    /// Build from an argv list; `None` when it is empty
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Program to run
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the program: a path as given, or a bare name on `PATH`
    #[must_use]
    pub fn resolve(&self) -> Option<PathBuf> {
        let direct = Path::new(&self.program);
        if direct.components().count() > 1 {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| candidate.is_file())
    }
}

impl Capability for CommandCapability {
    fn is_ready(&self) -> bool {
        self.resolve().is_some()
    }

    fn invoke(&self, prompt: &str) -> Result<Value, BridgeError> {
        let spawn_err = |source| BridgeError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // Written on its own thread while stderr drains; the pipe closes when it returns
        let stdin = child.stdin.take();
        let payload = prompt.to_owned();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(spawn_err)?;
        let written = writer.join();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BridgeError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(Ok(())) => Ok(Value::Bool(true)),
            Ok(Err(source)) => Err(spawn_err(source)),
            Err(_) => Err(BridgeError::Failed(format!("{}: stdin writer panicked", self.program))),
        }
    }
}

/// Registry with the configured assistant command, if any, under `name`
#[must_use]
pub fn registry_from_command(name: &str, argv: &[String]) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    if let Some(command) = CommandCapability::from_argv(argv) {
        registry.register(name, Arc::new(command));
    }
    registry
}
