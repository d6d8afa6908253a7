use clap::Parser;
use egui::Vec2;
use log::info;

use paddock::client::ApiClient;
use paddock::config::AppConfig;
use paddock::ui::DashboardApp;
use paddock::ui::details::DetailsVariant;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the RacePi backend
    #[arg(short, long)]
    backend: Option<String>,

    /// Session to open at startup
    #[arg(short, long)]
    session: Option<String>,

    /// Which pair of detail plots to show
    #[arg(short, long, value_enum)]
    details: Option<DetailsVariant>,

    /// Show the IMU sample table alongside GPS data
    #[arg(long)]
    imu: bool,

    /// Start from default settings instead of the saved config file
    #[arg(long)]
    ignore_saved_config: bool,
}

fn main() {
    colog::init();

    let args = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let mut app_config = if args.ignore_saved_config {
        AppConfig::default()
    } else {
        AppConfig::from_local_file().unwrap_or_default()
    };
    if let Some(backend) = args.backend {
        app_config.backend_url = backend;
    }
    if let Some(details) = args.details {
        app_config.details_variant = details;
    }
    if args.imu {
        app_config.show_imu_table = true;
    }

    let client = ApiClient::new(&app_config.backend_url).expect("Invalid backend URL");
    info!("Connecting to backend at {}", app_config.backend_url);

    let window_position = app_config.window_position.clone();
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(1100., 750.))
        .with_position(window_position);

    eframe::run_native(
        "Paddock",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                client,
                app_config,
                args.session,
                cc,
            )))
        }),
    )
    .expect("could not start app");
}
