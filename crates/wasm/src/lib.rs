//! WebAssembly bindings for the ossim models.
//!
//! Exposes the scheduler and the allocator to a browser front end. The page owns
//! the periodic timer and calls `tick` on each interval; everything it renders
//! comes from the JSON snapshots and log arrays returned here.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use ossim_core::common::XorShift64;
use ossim_core::config::{Config, Speed};
use ossim_core::mem::{AllocationOutcome, MemoryAllocator};
use ossim_core::sched::FcfsScheduler;
use ossim_core::{SimError, SimResult};

fn to_js(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parses an optional JSON config and overrides its seed.
fn build_config(seed: u64, config_json: Option<String>) -> SimResult<Config> {
    let mut config = match config_json.as_deref() {
        Some(text) if !text.trim().is_empty() => Config::from_json(text)?,
        _ => Config::default(),
    };
    config.general.seed = seed;
    Ok(config)
}

fn log_array<'a>(lines: impl Iterator<Item = &'a str>) -> Array {
    lines.map(JsValue::from_str).collect()
}

/// Browser handle around an [`FcfsScheduler`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct SchedulerHandle {
    inner: FcfsScheduler,
}

#[wasm_bindgen]
impl SchedulerHandle {
    /// Creates a stopped scheduler. `config_json` may be omitted or empty.
    ///
    /// # Errors
    ///
    /// Throws the configuration error message if `config_json` is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: Option<String>) -> Result<SchedulerHandle, JsValue> {
        let config = build_config(seed, config_json).map_err(to_js)?;
        Ok(Self {
            inner: FcfsScheduler::from_config(&config),
        })
    }

    /// Adds a process and returns its pid.
    #[wasm_bindgen(js_name = addProcess)]
    pub fn add_process(&mut self) -> u32 {
        self.inner.add_process()
    }

    /// Starts the clock.
    pub fn start(&mut self) {
        self.inner.start();
    }

    /// Stops the clock.
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Starts if stopped, stops if running.
    pub fn toggle(&mut self) {
        self.inner.toggle();
    }

    /// Clears all processes and history.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Sets the speed multiplier (0.5, 1, 2 or 5).
    ///
    /// # Errors
    ///
    /// Throws for any other multiplier; the current speed is kept.
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), JsValue> {
        let speed = Speed::try_from(multiplier).map_err(to_js)?;
        self.inner.set_speed(speed);
        Ok(())
    }

    /// Advances one tick and returns the clock.
    pub fn tick(&mut self) -> u64 {
        self.inner.tick()
    }

    /// Logical clock (ms).
    #[wasm_bindgen(getter)]
    pub fn clock(&self) -> u64 {
        self.inner.clock()
    }

    /// Whether the clock is advancing.
    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Pid of the process about to run, if any.
    #[wasm_bindgen(getter)]
    pub fn highlighted(&self) -> Option<u32> {
        self.inner.highlighted()
    }

    /// History lines, oldest first.
    pub fn log(&self) -> Array {
        let lines = self.inner.log().messages();
        log_array(lines.iter().map(String::as_str))
    }

    /// Full state as JSON.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.inner.snapshot())
    }

    /// Statistics as JSON.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn stats(&self) -> Result<String, JsValue> {
        to_json(&self.inner.stats())
    }
}

/// Browser handle around a [`MemoryAllocator`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct AllocatorHandle {
    inner: MemoryAllocator,
}

#[wasm_bindgen]
impl AllocatorHandle {
    /// Creates an allocator with freshly generated blocks.
    ///
    /// # Errors
    ///
    /// Throws the configuration error message if `config_json` is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: Option<String>) -> Result<AllocatorHandle, JsValue> {
        let config = build_config(seed, config_json).map_err(to_js)?;
        Ok(Self {
            inner: MemoryAllocator::from_config(&config),
        })
    }

    /// Creates an allocator over explicit block sizes.
    #[wasm_bindgen(js_name = withSizes)]
    pub fn with_sizes(seed: u64, sizes: Vec<u32>) -> Result<AllocatorHandle, JsValue> {
        let mut config = Config::default();
        config.memory.block_sizes = Some(sizes);
        config.validate().map_err(to_js)?;
        Ok(Self {
            inner: MemoryAllocator::new(config.memory, Box::new(XorShift64::new(seed))),
        })
    }

    /// Places a request with Best-Fit. Returns the chosen block id, or `undefined`.
    ///
    /// A failure is also echoed to the browser console.
    pub fn allocate(&mut self, size_kb: u32, label: &str) -> Option<usize> {
        match self.inner.allocate(size_kb, label) {
            AllocationOutcome::Allocated { block, .. } => Some(block),
            AllocationOutcome::Failed { requested } => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "Allocation failed: No block large enough for {requested}KB request"
                )));
                None
            }
        }
    }

    /// Frees the lowest-id Used block. Returns its id, or `undefined`.
    pub fn free(&mut self) -> Option<usize> {
        self.inner.free().block()
    }

    /// Advances the system clock and returns it.
    pub fn tick(&mut self) -> u64 {
        self.inner.tick()
    }

    /// Frees every block and clears history.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Request size to pre-fill in the input (KB).
    #[wasm_bindgen(getter, js_name = defaultRequestKb)]
    pub fn default_request_kb(&self) -> u32 {
        self.inner.config().default_request_kb
    }

    /// History lines, oldest first.
    pub fn log(&self) -> Array {
        let lines = self.inner.log().messages();
        log_array(lines.iter().map(String::as_str))
    }

    /// Full state as JSON.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.inner.snapshot())
    }

    /// Statistics as JSON.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn stats(&self) -> Result<String, JsValue> {
        to_json(&self.inner.compute_stats())
    }
}
