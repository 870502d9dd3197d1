use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser, Subcommand};
use env_logger::Env;
use hue_control::{
    config::DOTENV_FILE,
    models::{self, Brightness, ColorPreset, Hue, Saturation, SetRequest, Target},
    BridgeClient, Config, Error, Result,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Philips Hue light controller", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Configure the Hue Bridge connection (saves to .env)
    Setup,

    /// List available rooms/groups
    List,

    /// Set brightness and color for lights
    Set(SetArgs),

    /// Turn all lights on
    On,

    /// Turn all lights off
    Off,
}

#[derive(Debug, clap::Args)]
struct SetArgs {
    #[arg(long, default_value = "all")]
    /// Room name to control
    room: String,

    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    /// Brightness percentage (0-100)
    brightness: i64,

    #[arg(long, allow_negative_numbers = true)]
    /// Hue value for color (0-65535)
    hue: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    /// Saturation value for color (0-254)
    sat: Option<i64>,

    #[arg(long)]
    /// Color preset: red, orange, yellow, green, cyan, blue, purple, pink, warm, cool, white
    color: Option<String>,
}

impl SetArgs {
    /// Validate every flag before anything touches the network
    fn request(&self) -> Result<SetRequest> {
        let mut request = SetRequest::new(Brightness::create(self.brightness)?);
        if let Some(color) = &self.color {
            request.color(ColorPreset::from_name(color)?);
        }
        if let Some(hue) = self.hue {
            request.hue(Hue::create(hue)?);
        }
        if let Some(sat) = self.sat {
            request.sat(Saturation::create(sat)?);
        }
        Ok(request)
    }
}

fn prompt(stdin: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().map_err(|e| Error::io("flush stdout", e))?;

    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .map_err(|e| Error::io("read stdin", e))?;
    Ok(line.trim().to_string())
}

fn setup() -> Result<()> {
    let mut stdin = io::stdin().lock();

    let bridge_ip = prompt(&mut stdin, "Enter Hue Bridge IP address: ")?;
    if bridge_ip.is_empty() {
        return Err(Error::Validation("bridge IP is required".to_string()));
    }

    prompt(
        &mut stdin,
        "\nPress the button on your Hue Bridge, then press Enter here...",
    )?;

    let api_key = BridgeClient::unpaired(&bridge_ip)?.pair()?;
    Config::new(&bridge_ip, &api_key).save()?;

    println!("\nSuccess! Configuration saved to {}", DOTENV_FILE);
    println!("You can now use 'hue-control list' to see your rooms.");
    Ok(())
}

fn list() -> Result<()> {
    let bridge = BridgeClient::new(&Config::load()?)?;
    let groups = bridge.groups()?;

    println!("Available Rooms/Groups:");
    println!("------------------------");
    for (id, group) in models::ordered(&groups) {
        println!("{}", group.describe(id));
    }
    Ok(())
}

fn set(args: &SetArgs) -> Result<()> {
    let request = args.request()?;
    let target = Target::from(args.room.as_str());

    let bridge = BridgeClient::new(&Config::load()?)?;
    bridge.set_state(&target, &request)?;

    println!("{}", request.summary(&target));
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Setup => setup(),
        Command::List => list(),
        Command::Set(set_args) => set(&set_args),
        Command::On => {
            BridgeClient::new(&Config::load()?)?.turn_on()?;
            println!("All lights turned on");
            Ok(())
        }
        Command::Off => {
            BridgeClient::new(&Config::load()?)?.turn_off()?;
            println!("All lights turned off");
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
