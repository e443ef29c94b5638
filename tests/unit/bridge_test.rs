//! Tests for the assistant bridge
//!
//! Every failure mode of a capability must come back as `false`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use findtask::bridge::{
    AssistantBridge, Capability, CapabilityRegistry, CommandCapability, DEFAULT_CAPABILITY,
    registry_from_command,
};
use findtask::error::BridgeError;
use serde_json::{Value, json};

/// Scripted capability for exercising the bridge
struct Fake {
    available: AtomicBool,
    reply: fn() -> Result<Value, BridgeError>,
    checks: AtomicUsize,
    invocations: AtomicUsize,
}

impl Fake {
    fn new(reply: fn() -> Result<Value, BridgeError>) -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            reply,
            checks: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
        })
    }
}

impl Capability for Fake {
    fn is_ready(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.available.load(Ordering::SeqCst)
    }

    fn invoke(&self, _prompt: &str) -> Result<Value, BridgeError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

struct Panicky;

impl Capability for Panicky {
    fn is_ready(&self) -> bool {
        panic!("readiness check exploded");
    }

    fn invoke(&self, _prompt: &str) -> Result<Value, BridgeError> {
        panic!("invoke exploded");
    }
}

fn bridge_with(capability: Arc<dyn Capability>) -> AssistantBridge {
    let mut registry = CapabilityRegistry::new();
    registry.register(DEFAULT_CAPABILITY, capability);
    AssistantBridge::new(registry, DEFAULT_CAPABILITY)
}

// =============================================================================
// BRIDGE
// =============================================================================

#[test]
fn test_missing_capability_is_false() {
    let bridge = AssistantBridge::new(CapabilityRegistry::new(), DEFAULT_CAPABILITY);
    assert!(!bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
}

#[test]
fn test_accepted_prompt_is_true() {
    let fake = Fake::new(|| Ok(Value::Bool(true)));
    let bridge = bridge_with(fake.clone());

    assert!(bridge.is_available());
    assert!(bridge.send_prompt("hello"));
    assert_eq!(fake.invocations.load(Ordering::SeqCst), 1);
}

#[test]
fn test_non_true_replies_are_false() {
    let replies: [fn() -> Result<Value, BridgeError>; 5] = [
        || Ok(Value::Bool(false)),
        || Ok(Value::Null),
        || Ok(json!("true")),
        || Ok(json!(1)),
        || Ok(json!({ "ok": true })),
    ];
    for reply in replies {
        let bridge = bridge_with(Fake::new(reply));
        assert!(!bridge.send_prompt("hello"));
    }
}

#[test]
fn test_error_reply_is_false() {
    let bridge = bridge_with(Fake::new(|| Err(BridgeError::Failed("nope".to_string()))));
    assert!(bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
}

#[test]
fn test_unavailable_capability_is_not_invoked() {
    let fake = Fake::new(|| Ok(Value::Bool(true)));
    fake.available.store(false, Ordering::SeqCst);
    let bridge = bridge_with(fake.clone());

    assert!(!bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
    assert_eq!(fake.invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_panics_are_contained() {
    let bridge = bridge_with(Arc::new(Panicky));
    assert!(!bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
}

#[test]
fn test_availability_is_checked_every_time() {
    let fake = Fake::new(|| Ok(Value::Bool(true)));
    let bridge = bridge_with(fake.clone());

    assert!(bridge.is_available());
    fake.available.store(false, Ordering::SeqCst);
    assert!(!bridge.is_available());
    fake.available.store(true, Ordering::SeqCst);
    assert!(bridge.is_available());
    assert_eq!(fake.checks.load(Ordering::SeqCst), 3);
}

// =============================================================================
// REGISTRY
// =============================================================================

#[test]
fn test_registry_register_and_unregister() {
    let mut registry = CapabilityRegistry::new();
    registry.register("b", Fake::new(|| Ok(Value::Bool(true))));
    registry.register("a", Fake::new(|| Ok(Value::Bool(true))));
    assert_eq!(registry.names(), vec!["a", "b"]);
    assert!(registry.lookup("a").is_some());

    assert!(registry.unregister("a"));
    assert!(!registry.unregister("a"));
    assert!(registry.lookup("a").is_none());
}

#[test]
fn test_bridge_targets_named_capability() {
    let mut registry = CapabilityRegistry::new();
    registry.register("other", Fake::new(|| Ok(Value::Bool(true))));
    let bridge = AssistantBridge::new(registry, "mine");

    assert_eq!(bridge.name(), "mine");
    assert!(!bridge.send_prompt("hello"));
}

// =============================================================================
// COMMAND CAPABILITY
// =============================================================================

#[test]
fn test_command_from_argv() {
    assert!(CommandCapability::from_argv(&[]).is_none());
    assert!(CommandCapability::from_argv(&["  ".to_string()]).is_none());

    let cmd = CommandCapability::from_argv(&["tool".to_string(), "--stdin".to_string()]).unwrap();
    assert_eq!(cmd.program(), "tool");
}

#[test]
fn test_missing_program_is_unavailable() {
    let argv = vec!["/definitely/not/here/findtask-assistant".to_string()];
    let registry = registry_from_command(DEFAULT_CAPABILITY, &argv);
    let bridge = AssistantBridge::new(registry, DEFAULT_CAPABILITY);

    assert!(!bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
}

#[test]
fn test_empty_command_registers_nothing() {
    let registry = registry_from_command(DEFAULT_CAPABILITY, &[]);
    assert!(registry.names().is_empty());
}

#[cfg(unix)]
#[test]
fn test_command_receives_prompt_on_stdin() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("prompt.txt");
    let argv = vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        format!("cat > '{}'", out.display()),
    ];
    let bridge = AssistantBridge::new(registry_from_command("sh", &argv), "sh");

    assert!(bridge.is_available());
    assert!(bridge.send_prompt("fix it please"));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "fix it please");
}

#[cfg(unix)]
#[test]
fn test_command_failure_is_false() {
    let argv = vec!["/bin/sh".to_string(), "-c".to_string(), "cat >/dev/null; exit 3".to_string()];
    let bridge = AssistantBridge::new(registry_from_command("sh", &argv), "sh");

    assert!(bridge.is_available());
    assert!(!bridge.send_prompt("hello"));
}

#[cfg(unix)]
#[test]
fn test_large_prompt_with_noisy_stderr_completes() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("prompt.txt");
    let argv = vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        format!("head -c 200000 /dev/zero >&2; cat > '{}'", out.display()),
    ];
    let bridge = AssistantBridge::new(registry_from_command("sh", &argv), "sh");
    let prompt = "x".repeat(200_000);

    assert!(bridge.send_prompt(&prompt));
    assert_eq!(std::fs::metadata(&out).unwrap().len(), 200_000);
}

#[cfg(unix)]
#[test]
fn test_command_ignoring_stdin_is_false() {
    let argv = vec!["/bin/sh".to_string(), "-c".to_string(), "exit 0".to_string()];
    let bridge = AssistantBridge::new(registry_from_command("sh", &argv), "sh");
    let prompt = "x".repeat(200_000);

    assert!(!bridge.send_prompt(&prompt));
}
