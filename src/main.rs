use cep_autofill::core::{AddressLookup, ConfigProvider, FormField};
use cep_autofill::utils::error::ErrorSeverity;
use cep_autofill::utils::logger;
use cep_autofill::{
    format_cep, Address, AddressForm, BlurOutcome, CepBinder, CliConfig, Command, FieldKind,
    InMemoryField, PostalCode, TomlConfig, ViaCepClient,
};
use clap::Parser;
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入並驗證配置
    let settings = match config.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config.command, &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(command: &Command, settings: &TomlConfig) -> cep_autofill::Result<()> {
    match command {
        Command::Format { raw } => {
            println!("{}", format_cep(raw));
        }
        Command::Lookup { cep, json } => {
            let cep = PostalCode::parse(cep)?;
            let client = ViaCepClient::from_config(settings)?;
            let address = client.lookup(&cep).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&address)?);
            } else {
                print_address(&cep, &address);
            }
        }
        Command::Fill {
            keystrokes,
            complement,
        } => {
            fill_form(keystrokes, complement.as_deref(), settings).await?;
        }
    }
    Ok(())
}

fn print_address(cep: &PostalCode, address: &Address) {
    println!("CEP: {}", cep);
    for kind in FieldKind::ADDRESS_FIELDS {
        if let Some(value) = address.get(kind).filter(|v| !v.is_empty()) {
            println!("{:<12} {}", format!("{}:", kind.element_id()), value);
        }
    }
}

/// 模擬表單互動：逐字輸入 CEP 後離開欄位
async fn fill_form(
    keystrokes: &str,
    complement: Option<&str>,
    settings: &TomlConfig,
) -> cep_autofill::Result<()> {
    let mut document: HashMap<&'static str, InMemoryField> = HashMap::new();
    document.insert(FieldKind::Cep.element_id(), InMemoryField::focused(""));
    for kind in FieldKind::ADDRESS_FIELDS {
        document.insert(kind.element_id(), InMemoryField::new(""));
    }
    if let (Some(text), Some(field)) = (complement, document.get(FieldKind::Complement.element_id()))
    {
        field.paste(text);
    }

    let Some(form) = AddressForm::resolve(|id| document.get(id).cloned()) else {
        return Ok(());
    };

    let client = ViaCepClient::from_config(settings)?;
    let binder = CepBinder::new(client, form).with_policy(settings.sequence_policy());

    for ch in keystrokes.chars() {
        binder.form().cep.type_char(ch);
        binder.on_input();
        tracing::debug!("⌨️  {:?} -> {:?}", ch, binder.form().cep.value());
    }

    binder.form().cep.set_focus(false);
    let outcome = binder.on_blur().await;
    match &outcome {
        BlurOutcome::Skipped => tracing::info!("CEP incomplete, no lookup issued"),
        BlurOutcome::Unavailable => tracing::info!("No address data available"),
        BlurOutcome::Superseded => tracing::info!("Lookup superseded by a newer one"),
        BlurOutcome::Filled(_) => tracing::info!("✅ Address filled"),
    }

    let cep_value = binder.form().cep.value();
    println!("{:<12} {}", "cep:", cep_value);
    for kind in FieldKind::ADDRESS_FIELDS {
        if let Some(field) = binder.form().field(kind) {
            println!("{:<12} {}", format!("{}:", kind.element_id()), field.value());
        }
    }
    Ok(())
}
