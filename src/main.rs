//! script-assist — terminal front end for the ScriptAssist session flow.

use clap::{ArgAction, Args, Parser, Subcommand};
use script_assist_lib::notice::{Notice, NoticeLevel};
use script_assist_lib::prescription::{MedicineEdit, PrescriptionRecord};
use script_assist_lib::session::{ProcessingTicker, Screen, PROCESSING_ROTATE_INTERVAL, SCAN_TIPS};
use script_assist_lib::settings::{self, AppConfig};
use script_assist_lib::{init_logging, SessionController};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "script-assist",
    version,
    about = "Photograph a handwritten prescription, get structured medicine details"
)]
struct Cli {
    /// Override the extraction model
    #[arg(long, global = true)]
    model: Option<String>,
    /// Debug-level logging
    #[arg(long, short, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a prescription image file
    Scan(ScanArgs),
    /// Capture a prescription with the device camera
    Camera(OutputArgs),
    /// Show configuration and credential status
    Check(CheckArgs),
    /// Save a Gemini API key to the OS keychain
    #[command(name = "set-key")]
    SetKey {
        /// The key; read from stdin when omitted
        key: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Write the effective configuration to the config file
    #[arg(long, action = ArgAction::SetTrue)]
    write_config: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Image file (JPEG, PNG, WebP, HEIC or HEIF)
    image: PathBuf,
    /// Correct a field before output, e.g. `--set 1:dosage=250mg`
    #[arg(long = "set", value_name = "INDEX:FIELD=VALUE", value_parser = parse_edit)]
    edits: Vec<FieldEdit>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Copy the summary to the clipboard
    #[arg(long, action = ArgAction::SetTrue)]
    copy: bool,
    /// Share the summary (falls back to clipboard)
    #[arg(long, action = ArgAction::SetTrue)]
    share: bool,
    /// Print the record as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Clone)]
struct FieldEdit {
    index: usize,
    field: String,
    value: String,
}

fn parse_edit(raw: &str) -> Result<FieldEdit, String> {
    let (index, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:FIELD=VALUE, got '{}'", raw))?;
    let (field, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX:FIELD=VALUE, got '{}'", raw))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a medicine number", index))?;
    if index == 0 {
        return Err("medicine numbers start at 1".into());
    }
    let mut edit = MedicineEdit::default();
    if !edit.set(field.trim(), value) {
        return Err(format!("unknown field '{}'", field.trim()));
    }
    Ok(FieldEdit {
        index,
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    settings::load_env_files();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load();
    if let Some(model) = cli.model.clone() {
        config.model = model;
    }

    let result = match cli.command {
        Commands::Scan(args) => scan(&config, args).await,
        Commands::Camera(args) => camera(&config, args).await,
        Commands::Check(args) => check(&config, &args),
        Commands::SetKey { key } => set_key(key),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn scan(config: &AppConfig, args: ScanArgs) -> Result<(), String> {
    let controller = script_assist_lib::default_controller(config);

    controller
        .select_file(&args.image)
        .await
        .map_err(|e| e.to_string())?;
    print_notices(&controller);

    match controller.with_session(|s| s.screen()) {
        Screen::Preview => {}
        Screen::Error => return Err(render_error(&controller)),
        // Rejected before reading; the notice says why.
        _ => return Err("No image selected.".into()),
    }
    print_preview(&controller);

    analyze_with_ticker(&controller).await?;
    if controller.with_session(|s| s.screen()) != Screen::Results {
        return Err(render_error(&controller));
    }

    for edit in args.edits {
        apply_edit(&controller, &edit)?;
    }
    print_notices(&controller);

    finish_results(&controller, &args.output).await
}

async fn camera(config: &AppConfig, args: OutputArgs) -> Result<(), String> {
    let controller = script_assist_lib::default_controller(config);

    controller.open_camera().await.map_err(|e| e.to_string())?;
    print_notices(&controller);

    let (screen, can_capture) = controller.with_session(|s| (s.screen(), s.can_capture()));
    if screen != Screen::CameraCapture {
        return Err("Camera is not available. Use `script-assist scan <IMAGE>` instead.".into());
    }
    if !can_capture {
        controller.close_camera().map_err(|e| e.to_string())?;
        return Err("Camera access was not granted.".into());
    }

    controller.capture_photo().map_err(|e| e.to_string())?;
    if controller.with_session(|s| s.screen()) != Screen::Preview {
        return Err(render_error(&controller));
    }
    print_preview(&controller);

    analyze_with_ticker(&controller).await?;
    if controller.with_session(|s| s.screen()) != Screen::Results {
        return Err(render_error(&controller));
    }
    finish_results(&controller, &args).await
}

fn check(config: &AppConfig, args: &CheckArgs) -> Result<(), String> {
    let api_key = settings::resolve_api_key();
    let extractor = script_assist_lib::llm::GeminiExtractor::new(config, api_key);
    let info = extractor.info();
    println!("Config file: {}", AppConfig::default_path().display());
    println!("Model:       {}", info.model);
    println!("Endpoint:    {}", info.endpoint);
    println!(
        "API key:     {}",
        if info.configured {
            "configured".to_string()
        } else {
            format!("missing (set {})", info.env_keys.join(" or "))
        }
    );
    println!("Max image:   {} bytes", config.max_image_bytes);

    if args.write_config {
        config.save().map_err(|e| e.to_string())?;
        println!("Wrote {}", AppConfig::default_path().display());
    }
    Ok(())
}

fn set_key(key: Option<String>) -> Result<(), String> {
    let key = read_key(key, std::io::stdin().lock())?;
    settings::save_api_key(&key).map_err(|e| e.to_string())?;
    println!("API key saved to the OS keychain.");
    Ok(())
}

/// The key from the argument, or the first line of `input`.
fn read_key(arg: Option<String>, mut input: impl std::io::BufRead) -> Result<String, String> {
    let raw = match arg {
        Some(key) => key,
        None => {
            let mut line = String::new();
            input.read_line(&mut line).map_err(|e| e.to_string())?;
            line
        }
    };
    let key = raw.trim();
    if key.is_empty() {
        return Err("No API key given.".into());
    }
    Ok(key.to_string())
}

/// Run extraction while rotating the processing message.
async fn analyze_with_ticker(controller: &SessionController) -> Result<(), String> {
    let analysis = controller.analyze();
    tokio::pin!(analysis);

    let mut ticker = ProcessingTicker::default();
    let mut interval = tokio::time::interval(PROCESSING_ROTATE_INTERVAL);
    interval.tick().await;
    eprintln!("{}", ticker.current());

    loop {
        tokio::select! {
            result = &mut analysis => {
                result.map_err(|e| e.to_string())?;
                return Ok(());
            }
            _ = interval.tick() => {
                eprintln!("{}", ticker.advance());
            }
        }
    }
}

fn apply_edit(controller: &SessionController, edit: &FieldEdit) -> Result<(), String> {
    let id = controller
        .with_session(|s| {
            s.record()
                .and_then(|r| r.medicines().get(edit.index - 1))
                .map(|m| m.id())
        })
        .ok_or_else(|| format!("There is no medicine #{}", edit.index))?;
    let mut change = MedicineEdit::default();
    change.set(&edit.field, edit.value.clone());
    controller
        .edit_medicine(id, change)
        .map_err(|e| e.to_string())
}

async fn finish_results(controller: &SessionController, output: &OutputArgs) -> Result<(), String> {
    let record = controller
        .with_session(|s| s.record().cloned())
        .ok_or("No prescription record is available")?;

    if output.json {
        let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        print_record(&record);
    }

    if output.copy {
        controller.copy_summary().map_err(|e| e.to_string())?;
    }
    if output.share {
        controller.share_summary().await.map_err(|e| e.to_string())?;
    }
    print_notices(controller);
    Ok(())
}

fn print_preview(controller: &SessionController) {
    controller.with_session(|s| {
        if let Some(image) = s.image() {
            match image.dimensions() {
                Some((w, h)) => eprintln!("Preview: {} {}x{} ({} bytes)", image.media_type(), w, h, image.len()),
                None => eprintln!("Preview: {} ({} bytes)", image.media_type(), image.len()),
            }
        }
    });
}

fn print_record(record: &PrescriptionRecord) {
    print!("{}", render_record(record));
}

/// Result cards plus the header block. Empty fields are hidden.
fn render_record(record: &PrescriptionRecord) -> String {
    let mut out = String::from("Prescription Insights\n");
    if record.is_empty() {
        out.push_str("\nNo medicines were detected in this image.\n");
    }
    for (i, medicine) in record.medicines().iter().enumerate() {
        let details = medicine.details();
        out.push_str(&format!(
            "\n{}. {} [{}]\n",
            i + 1,
            medicine.display_name(),
            medicine.dosage_form().label()
        ));
        for (label, value) in [
            ("Dosage:      ", Some(&details.dosage)),
            ("Frequency:   ", Some(&details.frequency)),
            ("Duration:    ", details.duration.as_ref()),
            ("Route:       ", details.route_of_administration.as_ref()),
            ("Instructions:", details.instructions.as_ref()),
        ] {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                out.push_str(&format!("   {} {}\n", label, v));
            }
        }
    }

    let header = record.header();
    if header.has_any() {
        out.push_str("\nOther Information\n");
        for (label, value) in [
            ("Doctor", &header.doctor_name),
            ("Clinic", &header.clinic_information),
            ("Date", &header.date_of_prescription),
            ("Patient", &header.patient_name),
        ] {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                out.push_str(&format!("   {}: {}\n", label, v));
            }
        }
    }
    out
}

/// Error screen text: message, tips, and the retry hint.
fn render_error(controller: &SessionController) -> String {
    print_notices(controller);
    let (message, can_retry) =
        controller.with_session(|s| (s.error_message().to_string(), s.can_retry_same_image()));
    let mut out = format!("Analysis Failed\n{}\n\nTips for a Better Scan:\n", message);
    for tip in SCAN_TIPS {
        out.push_str(&format!("  - {}\n", tip));
    }
    if can_retry {
        out.push_str("\nRun the same command again to retry this image.");
    }
    out
}

fn print_notices(controller: &SessionController) {
    for notice in controller.take_notices() {
        print_notice(&notice);
    }
}

fn print_notice(notice: &Notice) {
    let prefix = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    eprintln!("[{}] {}", prefix, notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_edits() {
        let edit = parse_edit("2:dosage=250 mg").unwrap();
        assert_eq!(edit.index, 2);
        assert_eq!(edit.field, "dosage");
        assert_eq!(edit.value, "250 mg");

        let cleared = parse_edit("1:duration=").unwrap();
        assert_eq!(cleared.value, "");
    }

    #[test]
    fn rejects_bad_edits() {
        assert!(parse_edit("dosage=1").is_err());
        assert!(parse_edit("0:dosage=1").is_err());
        assert!(parse_edit("1:color=red").is_err());
        assert!(parse_edit("x:dosage=1").is_err());
    }

    #[test]
    fn key_comes_from_argument_or_stdin() {
        assert_eq!(read_key(Some(" abc ".into()), std::io::empty()).unwrap(), "abc");
        assert_eq!(read_key(None, "xyz\nignored\n".as_bytes()).unwrap(), "xyz");
        assert!(read_key(None, std::io::empty()).is_err());
    }

    #[test]
    fn cli_parses_set_key_and_check() {
        let cli = Cli::try_parse_from(["script-assist", "set-key", "k"]).unwrap();
        assert!(matches!(cli.command, Commands::SetKey { key: Some(ref k) } if k == "k"));

        let cli = Cli::try_parse_from(["script-assist", "check", "--write-config"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(CheckArgs { write_config: true })));
    }

    #[test]
    fn cards_hide_empty_fields() {
        use script_assist_lib::llm::{ExtractedMedicine, ExtractionOutput};

        let record = PrescriptionRecord::from_extraction(ExtractionOutput {
            medicines: vec![ExtractedMedicine {
                medicine_name: "Paracetamol".into(),
                dosage: String::new(),
                frequency: "every 6 hours".into(),
                duration: None,
                route_of_administration: Some(String::new()),
                instructions: Some("with water".into()),
            }],
            doctor_name: Some(String::new()),
            clinic_information: None,
            patient_name: Some("A. Patel".into()),
            date_of_prescription: None,
        });
        let text = render_record(&record);
        assert!(!text.contains("Dosage"));
        assert!(!text.contains("Route"));
        assert!(!text.contains("Doctor"));
        assert!(text.contains("Frequency:    every 6 hours"));
        assert!(text.contains("Instructions: with water"));
        assert!(text.contains("Patient: A. Patel"));
    }

    #[test]
    fn cli_accepts_repeated_set() {
        let cli = Cli::try_parse_from([
            "script-assist",
            "scan",
            "rx.jpg",
            "--set",
            "1:dosage=1",
            "--set",
            "2:name=X",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.edits.len(), 2);
                assert!(args.output.json);
            }
            _ => panic!("expected scan"),
        }
    }
}
