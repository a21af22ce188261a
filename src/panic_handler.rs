use log::error;
use std::io::{self, Write};
use std::panic;

pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Leave a trace in the log file before the backtrace hits stderr
        error!("Panic: {panic_info}");
        log::logger().flush();

        default_hook(panic_info);
        let _ = writeln!(io::stderr());

        std::process::exit(1);
    }));
}
