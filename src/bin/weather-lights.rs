use std::process;

use clap::Parser;
use env_logger::Env;
use hue_control::{
    delegate,
    models::{Brightness, SetRequest, Target},
    weather::{Advice, Weather, DEFAULT_PROVIDER},
    BridgeClient, Config, Result, WeatherClient,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Set Hue lights from the current weather", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "")]
    /// Location for weather (default: auto-detect)
    location: String,

    #[arg(short, long, default_value = "all")]
    /// Room to control
    room: String,

    #[arg(short, long, default_value_t = 80, allow_negative_numbers = true)]
    /// Brightness percentage (0-100)
    brightness: i64,

    #[arg(short = 'n', long)]
    /// Show what would be done without changing anything
    dry_run: bool,

    #[arg(short = 'x', long)]
    /// Run the hue-control binary instead of calling the bridge directly
    exec: bool,

    #[arg(short, long, env = "WEATHER_API_URL", default_value = DEFAULT_PROVIDER)]
    /// Weather service base URL
    provider: String,
}

fn report(weather: &Weather, advice: &Advice, brightness: &Brightness) {
    println!("Location: {}", weather.location());
    match weather.feels_like_c() {
        Some(feels) => println!(
            "Temperature: {}°C (feels like {}°C)",
            weather.temp_c(),
            feels
        ),
        None => println!("Temperature: {}°C", weather.temp_c()),
    }
    println!(
        "Condition: {} (code: {})",
        weather.description(),
        weather.code()
    );

    let mut msg = format!(
        "Setting lights to: {} at {}% brightness",
        advice.color(),
        brightness.value()
    );
    if advice.adjusted() {
        msg.push_str(&format!(
            " (adjusted from {} due to temperature)",
            advice.base()
        ));
    }
    println!("{}", msg);
}

fn run(args: Args) -> Result<()> {
    let brightness = Brightness::create(args.brightness)?;
    let target = Target::from(args.room.as_str());

    let weather = WeatherClient::new(&args.provider)?.current(&args.location)?;
    let advice = weather.advise();
    report(&weather, &advice, &brightness);

    if args.dry_run {
        println!("\n[Dry run - no changes made]");
        return Ok(());
    }

    let mut request = SetRequest::new(brightness);
    request.color(advice.color());

    if args.exec {
        let binary = delegate::find_bridge_binary()?;
        delegate::run_set(&binary, &target, &request)
    } else {
        BridgeClient::new(&Config::load()?)?.set_state(&target, &request)?;
        println!("{}", request.summary(&target));
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["weather-lights"]).unwrap();
        assert_eq!(args.location, "");
        assert_eq!(args.room, "all");
        assert_eq!(args.brightness, 80);
        assert!(!args.dry_run);
        assert!(!args.exec);
    }

    #[test]
    fn flags() {
        let args = Args::try_parse_from([
            "weather-lights",
            "--location",
            "Tromsø",
            "--room",
            "Office",
            "--brightness",
            "40",
            "--dry-run",
            "--provider",
            "http://127.0.0.1:1",
        ])
        .unwrap();
        assert_eq!(args.location, "Tromsø");
        assert_eq!(Target::from(args.room.as_str()), Target::Room("Office".to_string()));
        assert_eq!(args.brightness, 40);
        assert!(args.dry_run);
        assert_eq!(args.provider, "http://127.0.0.1:1");
    }
}
