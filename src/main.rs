fn main() {
    // .env is optional; real deployments configure via the environment.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    #[cfg(feature = "ui")]
    dioxus::launch(floatchat::ui::App);

    #[cfg(not(feature = "ui"))]
    eprintln!("floatchat was built without a UI; enable the `desktop`, `web`, or `mobile` feature");
}
