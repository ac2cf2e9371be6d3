/// Test utils.
use std::sync::Mutex;

lazy_static! {
    pub static ref SET_UP_DONE: Mutex<bool> = Mutex::new(false);
}

/// Initialises logging once for the whole test binary.
pub fn set_up() {
    let mut state = match SET_UP_DONE.lock() {
        Ok(state) => state,
        Err(poisoned) => poisoned.into_inner(),
    };
    if !*state {
        let _ = pretty_env_logger::try_init();
        *state = true;
    }
}
