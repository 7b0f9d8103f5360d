/// TStack Terminal Demo - Transform Hierarchies
///
/// Draws a small scene built from nested model transforms, seen through an
/// orbiting camera.
/// Controls:
///   - +/-: Move the camera closer or farther
///   - Arrow Keys: Orbit the camera
///   - A/D: Spin the scene
///   - 1/2: Orbit camera, perspective / orthographic projection
///   - 3: Fixed square camera with a frustum
///   - R: Reset camera and scene
///   - Q/ESC: Quit

use std::io;
use tstack_terminal::logging::{init_logging, LoggingConfig};
use tstack_terminal::{DemoConfig, TerminalApp};

fn main() -> io::Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::default();
    log::info!("starting demo with {:?}", config);
    println!("TStack Terminal Demo - press Q to quit");
    std::thread::sleep(std::time::Duration::from_millis(500));

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Bye.");
    Ok(())
}
