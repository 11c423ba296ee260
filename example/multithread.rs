//! Two independent servers in one process, stopped from the outside.

use std::time::Duration;

use loam::{App, Config, Error, Request, Response};

fn build(name: &'static str) -> Result<App, Error> {
    let mut app = App::new(Config {
        handle_signal: false,
        ..Config::default()
    })?;

    app.get("/", move |_req: &mut Request, res: &mut Response| {
        res.send_fmt(format_args!("hello from {name}"));
    })?;

    Ok(app)
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let one = build("one")?;
    let two = build("two")?;

    let stop_one = one.stop_handle();
    let stop_two = two.stop_handle();

    let handle = std::thread::spawn(move || two.run("127.0.0.1:8086"));

    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(60));
        stop_one.stop();
        stop_two.stop();
    });

    one.run("127.0.0.1:8085")?;

    handle.join().expect("server thread panicked")
}
