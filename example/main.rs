use loam::{App, Config, Error, Request, Response};

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut app = App::new(Config::default())?;

    app.local("motd", "have a nice day");

    // user pages require a token, everyone else is turned away
    app.middleware("/user/*", |req: &mut Request, res: &mut Response| {
        if req.query("token").is_none() {
            res.set_status(401);
            res.send("missing token");
            req.cancel();
        }
    })?;

    app.get("/", |req: &mut Request, res: &mut Response| {
        let motd = req.local("motd").unwrap_or_default().to_owned();
        res.send_fmt(format_args!("hello from loam, {motd}"));
    })?;

    app.get("/user/:name", |req: &mut Request, res: &mut Response| {
        let name = req.param("name").unwrap_or("stranger").to_owned();
        res.send_fmt(format_args!("hello {name}"));
    })?;

    app.post("/echo", |req: &mut Request, res: &mut Response| {
        let mut body = vec![0u8; req.body_size() as usize];
        match req.body(&mut body) {
            Ok(_) => res.send(body),
            Err(err) => {
                res.set_status(400);
                res.send_fmt(format_args!("cannot read body: {err}"));
            }
        }
    })?;

    app.get("/info", |req: &mut Request, res: &mut Response| {
        let info = serde_json::json!({
            "peer": req.peer().to_string(),
            "version": req.version().to_string(),
        });
        if res.json(&info).is_err() {
            res.set_status(500);
        }
    })?;

    app.static_dir("/static", "./static")?;

    app.fallback(|_req: &mut Request, res: &mut Response| {
        res.set_status(404);
        res.send("nothing here");
    });

    app.run("0.0.0.0:8080")
}
