//! Build script for nixie-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Generates `config.rs` (digit count, timing constants, pin macros)

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIO numbers reserved for the I2C target (SDA, SCL)
const BUS_PINS: [i64; 2] = [0, 1];

/// Highest GPIO number on the RP2040
const MAX_GPIO: i64 = 29;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of display.toml
struct DisplayToml {
    digits: usize,
    frame_period_us: u16,
    after_image_us: u16,
    gamma: f64,
    intro_on_boot: bool,
    power_up_delay_ms: u16,
    bus_address: u8,
    bcd: Vec<u8>,
    anodes: Vec<u8>,
    points: Vec<u8>,
    left_comma: u8,
    right_comma: u8,
    hv_enable: u8,
    status_led: u8,
}

/// Validate display.toml configuration at compile time
fn validate_config() -> DisplayToml {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the nixie-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let display = validate_display(&config, &mut errors);
    let bus_address = validate_bus(&config, &mut errors);
    let pins = validate_pins(&config, display.as_ref().map(|d| d.0), &mut errors);

    report_errors(&errors);

    // report_errors panics on any error, so every section is present here
    let (digits, frame_period_us, after_image_us, gamma, intro_on_boot, power_up_delay_ms) =
        display.unwrap();
    let pins = pins.unwrap();

    println!("cargo:warning=display.toml validated successfully");

    DisplayToml {
        digits,
        frame_period_us,
        after_image_us,
        gamma,
        intro_on_boot,
        power_up_delay_ms,
        bus_address: bus_address.unwrap(),
        bcd: pins.bcd,
        anodes: pins.anodes,
        points: pins.points,
        left_comma: pins.left_comma,
        right_comma: pins.right_comma,
        hv_enable: pins.hv_enable,
        status_led: pins.status_led,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid display.toml                                     ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn get_int(section: &toml::Value, key: &str, ctx: &str, errors: &mut Vec<String>) -> Option<i64> {
    match section.get(key) {
        Some(value) => match value.as_integer() {
            Some(v) => Some(v),
            None => {
                errors.push(format!("[{}] {} must be an integer", ctx, key));
                None
            }
        },
        None => {
            errors.push(format!("[{}] missing '{}'", ctx, key));
            None
        }
    }
}

fn get_int_in(
    section: &toml::Value,
    key: &str,
    ctx: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = get_int(section, key, ctx, errors)?;
    if range.contains(&value) {
        Some(value)
    } else {
        errors.push(format!(
            "[{}] {} = {} (must be {}..={})",
            ctx,
            key,
            value,
            range.start(),
            range.end()
        ));
        None
    }
}

/// Validate the [display] section
///
/// Returns (digits, frame_period_us, after_image_us, gamma, intro_on_boot, power_up_delay_ms).
fn validate_display(
    config: &toml::Value,
    errors: &mut Vec<String>,
) -> Option<(usize, u16, u16, f64, bool, u16)> {
    let Some(display) = config.get("display") else {
        errors.push("Missing [display] section".to_string());
        return None;
    };

    let digits = get_int_in(display, "digits", "display", 2..=6, errors);
    let frame_period = get_int_in(display, "frame_period_us", "display", 1..=u16::MAX as i64, errors);
    let after_image = get_int_in(display, "after_image_us", "display", 1..=u16::MAX as i64, errors);
    let power_up = get_int_in(display, "power_up_delay_ms", "display", 0..=u16::MAX as i64, errors);

    let gamma = match display.get("gamma") {
        Some(value) => {
            let gamma = value.as_float().or_else(|| value.as_integer().map(|i| i as f64));
            match gamma {
                Some(g) if g > 0.0 && g <= 8.0 => Some(g),
                Some(g) => {
                    errors.push(format!("[display] gamma = {} (must be in (0, 8])", g));
                    None
                }
                None => {
                    errors.push("[display] gamma must be a number".to_string());
                    None
                }
            }
        }
        None => {
            errors.push("[display] missing 'gamma'".to_string());
            None
        }
    };

    let intro_on_boot = match display.get("intro_on_boot") {
        Some(value) => match value.as_bool() {
            Some(b) => Some(b),
            None => {
                errors.push("[display] intro_on_boot must be true or false".to_string());
                None
            }
        },
        None => Some(true),
    };

    Some((
        digits? as usize,
        frame_period? as u16,
        after_image? as u16,
        gamma?,
        intro_on_boot?,
        power_up? as u16,
    ))
}

/// Validate the [bus] section
fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) -> Option<u8> {
    let Some(bus) = config.get("bus") else {
        errors.push("Missing [bus] section".to_string());
        return None;
    };

    let address = get_int(bus, "address", "bus", errors)?;
    // 0x04 sits in the reserved range but is what existing hosts use
    if address == 0x04 || (0x08..=0x77).contains(&address) {
        Some(address as u8)
    } else {
        errors.push(format!(
            "[bus] address = {:#04x} (must be 0x04 or 0x08..=0x77)",
            address
        ));
        None
    }
}

struct PinMap {
    bcd: Vec<u8>,
    anodes: Vec<u8>,
    points: Vec<u8>,
    left_comma: u8,
    right_comma: u8,
    hv_enable: u8,
    status_led: u8,
}

fn get_pin_list(
    pins: &toml::Value,
    key: &str,
    len: Option<usize>,
    errors: &mut Vec<String>,
) -> Option<Vec<i64>> {
    let Some(list) = pins.get(key).and_then(|v| v.as_array()) else {
        errors.push(format!("[pins] {} must be a list of GPIO numbers", key));
        return None;
    };
    let values: Option<Vec<i64>> = list.iter().map(|v| v.as_integer()).collect();
    let Some(values) = values else {
        errors.push(format!("[pins] {} must contain only integers", key));
        return None;
    };
    if let Some(len) = len {
        if values.len() != len {
            errors.push(format!(
                "[pins] {} has {} entries (expected {})",
                key,
                values.len(),
                len
            ));
            return None;
        }
    }
    Some(values)
}

/// Validate the [pins] section
fn validate_pins(
    config: &toml::Value,
    digits: Option<usize>,
    errors: &mut Vec<String>,
) -> Option<PinMap> {
    let Some(pins) = config.get("pins") else {
        errors.push("Missing [pins] section".to_string());
        return None;
    };

    let bcd = get_pin_list(pins, "bcd", Some(4), errors);
    let anodes = get_pin_list(pins, "anodes", digits, errors);
    let points = get_pin_list(pins, "points", Some(2), errors);
    let left_comma = get_int(pins, "left_comma", "pins", errors);
    let right_comma = get_int(pins, "right_comma", "pins", errors);
    let hv_enable = get_int(pins, "hv_enable", "pins", errors);
    let status_led = get_int(pins, "status_led", "pins", errors);

    let (bcd, anodes, points) = (bcd?, anodes?, points?);
    let singles = [left_comma?, right_comma?, hv_enable?, status_led?];

    // Every GPIO may be used once, and never for the bus
    let mut seen = BUS_PINS.to_vec();
    for &pin in bcd.iter().chain(&anodes).chain(&points).chain(&singles) {
        if !(0..=MAX_GPIO).contains(&pin) {
            errors.push(format!("[pins] GPIO {} does not exist (0..={})", pin, MAX_GPIO));
        } else if seen.contains(&pin) {
            errors.push(format!("[pins] GPIO {} is assigned twice or used by the bus", pin));
        }
        seen.push(pin);
    }

    let narrow = |list: &[i64]| list.iter().map(|&p| p as u8).collect::<Vec<_>>();
    Some(PinMap {
        bcd: narrow(&bcd),
        anodes: narrow(&anodes),
        points: narrow(&points),
        left_comma: singles[0] as u8,
        right_comma: singles[1] as u8,
        hv_enable: singles[2] as u8,
        status_led: singles[3] as u8,
    })
}

fn pin_expr(pin: u8) -> String {
    format!("embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_{})", pin)
}

fn pin_array(pins: &[u8]) -> String {
    let items: Vec<String> = pins.iter().map(|&p| pin_expr(p)).collect();
    format!("[{}]", items.join(", "))
}

/// Write config.rs into OUT_DIR
fn generate_config(config: &DisplayToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("config.rs")).unwrap();

    let gamma = format!("{:?}", config.gamma as f32);

    writeln!(f, "// Generated from display.toml by build.rs").unwrap();
    writeln!(f).unwrap();
    writeln!(f, "/// Number of lamps on this board").unwrap();
    writeln!(f, "pub const DIGIT_COUNT: usize = {};", config.digits).unwrap();
    writeln!(f).unwrap();
    writeln!(f, "/// Display timing and bus settings").unwrap();
    writeln!(f, "pub const DISPLAY_CONFIG: nixie_core::DisplayConfig = nixie_core::DisplayConfig {{").unwrap();
    writeln!(f, "    frame_period_us: {},", config.frame_period_us).unwrap();
    writeln!(f, "    after_image_us: {},", config.after_image_us).unwrap();
    writeln!(f, "    gamma: {},", gamma).unwrap();
    writeln!(f, "    bus_address: {:#04x},", config.bus_address).unwrap();
    writeln!(f, "    intro_on_boot: {},", config.intro_on_boot).unwrap();
    writeln!(f, "    power_up_delay_ms: {},", config.power_up_delay_ms).unwrap();
    writeln!(f, "}};").unwrap();
    writeln!(f).unwrap();

    writeln!(f, "/// Take the display line pins from the peripherals").unwrap();
    writeln!(f, "macro_rules! display_pins {{").unwrap();
    writeln!(f, "    ($p:ident) => {{").unwrap();
    writeln!(f, "        nixie_hal_rp2040::DisplayPins::<$crate::config::DIGIT_COUNT> {{").unwrap();
    writeln!(f, "            bcd: {},", pin_array(&config.bcd)).unwrap();
    writeln!(f, "            anodes: {},", pin_array(&config.anodes)).unwrap();
    writeln!(f, "            points: {},", pin_array(&config.points)).unwrap();
    writeln!(f, "            left_comma: {},", pin_expr(config.left_comma)).unwrap();
    writeln!(f, "            right_comma: {},", pin_expr(config.right_comma)).unwrap();
    writeln!(f, "        }}").unwrap();
    writeln!(f, "    }};").unwrap();
    writeln!(f, "}}").unwrap();
    writeln!(f).unwrap();

    writeln!(f, "/// Take the high-voltage supply enable pin").unwrap();
    writeln!(f, "macro_rules! hv_enable_pin {{").unwrap();
    writeln!(f, "    ($p:ident) => {{ {} }};", pin_expr(config.hv_enable)).unwrap();
    writeln!(f, "}}").unwrap();
    writeln!(f).unwrap();

    writeln!(f, "/// Take the status LED pin").unwrap();
    writeln!(f, "macro_rules! status_led_pin {{").unwrap();
    writeln!(f, "    ($p:ident) => {{ {} }};", pin_expr(config.status_led)).unwrap();
    writeln!(f, "}}").unwrap();
}
