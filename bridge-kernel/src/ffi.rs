//! C-ABI surface binding the kernel to the native runtime library.
//!
//! Host-to-native calls go through [`NativeRuntime`], which marshals
//! arguments as C strings valid for the duration of each call and copies
//! every native-allocated reply before releasing it. The native-to-host
//! direction is the exported [`tool_callback`], which the native runtime
//! invokes with a tool identifier and JSON input while a prompt is in
//! flight.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::OnceLock;

use bridge_codec::error_payload;
use bridge_primitives::{AgentHandle, ToolId};

use crate::{NativeBoundary, ToolDispatcher};

mod native {
    use std::os::raw::c_char;

    unsafe extern "C" {
        pub fn create_agent(
            name: *const c_char,
            model: *const c_char,
            api_key: *const c_char,
            base_url: *const c_char,
            preamble: *const c_char,
        ) -> *mut c_char;

        pub fn register_tool(
            agent_id: *const c_char,
            tool_name: *const c_char,
            tool_description: *const c_char,
            tool_parameters: *const c_char,
            tool_id: u64,
        ) -> *mut c_char;

        pub fn send_prompt(agent_id: *const c_char, prompt: *const c_char) -> *mut c_char;

        pub fn release_native_buffer(ptr: *mut c_char);
    }
}

/// Reply buffer owned by the native runtime.
///
/// The buffer stays native-owned until dropped; dropping releases it through
/// `release_native_buffer` on every exit path, early returns included.
struct NativeBuffer(*mut c_char);

impl NativeBuffer {
    fn copy_to_string(&self) -> String {
        if self.0.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(self.0) }.to_string_lossy().into_owned()
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { native::release_native_buffer(self.0) };
        }
    }
}

/// Marshals a host string for a single boundary call.
///
/// Interior NUL bytes cannot cross a C boundary; they are stripped rather
/// than failing the whole call.
fn c_string(value: &str) -> CString {
    CString::new(value).unwrap_or_else(|_| {
        let cleaned: String = value.chars().filter(|&c| c != '\0').collect();
        CString::new(cleaned).unwrap_or_default()
    })
}

/// [`NativeBoundary`] implementation backed by the linked native runtime
/// library.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Creates the boundary front-end. Stateless; all state lives on the
    /// native side, keyed by the handles it returns.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NativeBoundary for NativeRuntime {
    fn create_agent(
        &self,
        name: &str,
        model: &str,
        api_key: &str,
        base_url: &str,
        preamble: &str,
    ) -> String {
        let name = c_string(name);
        let model = c_string(model);
        let api_key = c_string(api_key);
        let base_url = c_string(base_url);
        let preamble = c_string(preamble);

        let reply = NativeBuffer(unsafe {
            native::create_agent(
                name.as_ptr(),
                model.as_ptr(),
                api_key.as_ptr(),
                base_url.as_ptr(),
                preamble.as_ptr(),
            )
        });
        reply.copy_to_string()
    }

    fn register_tool(
        &self,
        handle: &AgentHandle,
        name: &str,
        description: &str,
        schema_json: &str,
        tool_id: ToolId,
    ) -> String {
        let agent_id = c_string(handle.as_str());
        let name = c_string(name);
        let description = c_string(description);
        let parameters = c_string(schema_json);

        let reply = NativeBuffer(unsafe {
            native::register_tool(
                agent_id.as_ptr(),
                name.as_ptr(),
                description.as_ptr(),
                parameters.as_ptr(),
                tool_id.get(),
            )
        });
        reply.copy_to_string()
    }

    fn send_prompt(&self, handle: &AgentHandle, prompt: &str) -> String {
        let agent_id = c_string(handle.as_str());
        let prompt = c_string(prompt);

        let reply =
            NativeBuffer(unsafe { native::send_prompt(agent_id.as_ptr(), prompt.as_ptr()) });
        reply.copy_to_string()
    }
}

static DISPATCHER: OnceLock<ToolDispatcher> = OnceLock::new();

/// Installs the dispatcher the exported [`tool_callback`] forwards to.
///
/// The callback signature carries no context pointer, so the process can
/// host exactly one dispatcher; agents and registries behind it remain
/// ordinary values.
///
/// # Errors
///
/// Returns the dispatcher back when one is already installed.
pub fn install_dispatcher(dispatcher: ToolDispatcher) -> Result<(), ToolDispatcher> {
    DISPATCHER.set(dispatcher)
}

/// Entry point the native runtime calls to execute a host tool.
///
/// Always answers with a payload string: unknown identifiers, malformed
/// input, handler faults, and panics are all folded into an error payload.
/// The returned buffer is `malloc`-allocated and released by the native
/// side with `free`; null is returned only if that allocation itself fails.
///
/// # Safety
///
/// `input` must be null or a valid NUL-terminated C string that stays alive
/// for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tool_callback(tool_id: u64, input: *const c_char) -> *mut c_char {
    let payload = panic::catch_unwind(AssertUnwindSafe(|| {
        let Some(dispatcher) = DISPATCHER.get() else {
            return error_payload("tool dispatcher is not installed");
        };
        if input.is_null() {
            return error_payload("tool input is null");
        }
        let input = unsafe { CStr::from_ptr(input) }.to_string_lossy();
        dispatcher.dispatch(ToolId::new(tool_id), &input)
    }))
    .unwrap_or_else(|_| error_payload("tool callback panicked"));

    into_native_reply(&payload)
}

/// Copies a payload into a `malloc`-allocated, NUL-terminated buffer the
/// native runtime releases with `free`.
fn into_native_reply(payload: &str) -> *mut c_char {
    let bytes = payload.as_bytes();
    unsafe {
        let buffer = libc::malloc(bytes.len() + 1).cast::<c_char>();
        if buffer.is_null() {
            return ptr::null_mut();
        }
        ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buffer, bytes.len());
        *buffer.add(bytes.len()) = 0;
        buffer
    }
}
