use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda_cell::calendar::DAY_NAMES;
use agenda_cell::models::ContactInfo;
use agenda_cell::{AgendaProvider, BookingWizard, MonthGrid, PatientAgenda, PublicAgenda, WizardStep};
use auth_cell::AccountService;
use dotenv::dotenv;
use shared_config::ApiConfig;
use shared_http::{ApiClient, AuthSession, FileTokenStore, MemoryTokenStore, TokenStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    if !config.is_configured() {
        return Err(anyhow!(
            "NUTRI_API_URL no está configurada. Exportala o agregala a un archivo .env"
        ));
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_login = args.iter().any(|a| a == "--login");
    let nutricionista_id: i64 = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| a.parse())
        .transpose()
        .context("El id de nutricionista debe ser numérico")?
        .map_or_else(|| prompt_i64("Id del nutricionista"), Ok)?;

    info!("Starting turnero against {}", config.base_url);

    let provider: Box<dyn AgendaProvider> = if use_login {
        let store: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let session = Arc::new(AuthSession::new(&config, store));
        let api = Arc::new(ApiClient::new(&config, session.clone()));

        if !session.is_authenticated().await {
            let account = AccountService::new(api.clone());
            let dni = prompt("DNI")?;
            let password = prompt("Contraseña")?;
            let user = account
                .login(dni.trim(), password.trim())
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            println!("Hola, {}.", user.full_name());
        }

        Box::new(PatientAgenda::new(api))
    } else {
        Box::new(PublicAgenda::new(Arc::new(ApiClient::public(&config))))
    };

    let today = Local::now().date_naive();
    let mut wizard = BookingWizard::new(nutricionista_id, today);

    run_wizard(provider.as_ref(), &mut wizard, today).await
}

async fn run_wizard(
    provider: &dyn AgendaProvider,
    wizard: &mut BookingWizard,
    today: NaiveDate,
) -> Result<()> {
    println!("== Reserva de turno ==");

    // Step 1: consultation type.
    let types = provider
        .consultation_types(wizard.nutricionista_id())
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    if types.is_empty() {
        return Err(anyhow!("El nutricionista no tiene tipos de consulta configurados."));
    }
    println!("\nTipo de consulta:");
    for (i, t) in types.iter().enumerate() {
        println!("  {}. {} ({} min) ${}", i + 1, t.label, t.duration_minutes, t.price);
    }
    let choice = prompt_index("Elegí una opción", types.len())?;
    wizard.select_type(types[choice].clone())?;

    // Step 2: location.
    let locations = provider
        .locations(wizard.nutricionista_id())
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    if locations.is_empty() {
        return Err(anyhow!("El nutricionista no tiene ubicaciones configuradas."));
    }
    println!("\nUbicación:");
    for (i, l) in locations.iter().enumerate() {
        let kind = if l.is_virtual { "virtual" } else { "presencial" };
        println!(
            "  {}. {} ({kind}){}",
            i + 1,
            l.name,
            l.address.as_deref().map(|a| format!(" - {a}")).unwrap_or_default()
        );
    }
    let choice = prompt_index("Elegí una opción", locations.len())?;
    wizard.select_location(locations[choice].clone())?;

    // Step 3: day, with month navigation.
    let date = pick_date(today)?;
    let query = wizard.select_date(date)?;
    wizard.load_slots(provider, query).await;

    // Step 4 onwards loops: a rejected submit sends us back here with a
    // fresh slot list.
    loop {
        if let Some(notice) = wizard.notice() {
            println!("\n⚠ {notice}");
        }

        let slots = match wizard.slots().succeeded() {
            Some(slots) => slots.clone(),
            None => {
                if let Some(err) = wizard.slots().failed() {
                    return Err(anyhow!(err.user_message()));
                }
                return Err(anyhow!("No se pudieron cargar los horarios."));
            }
        };
        if slots.is_empty() {
            return Err(anyhow!("No hay horarios disponibles para ese día."));
        }

        println!("\nHorarios disponibles:");
        for (i, slot) in slots.iter().enumerate() {
            println!("  {}. {}", i + 1, slot);
        }
        let choice = prompt_index("Elegí un horario", slots.len())?;
        wizard.select_slot(slots[choice].clone())?;

        // Step 5: contact details (asked once, kept across retries).
        if wizard.draft().contact.is_none() {
            let full_name = prompt("Nombre completo")?;
            let email = prompt("Email")?;
            let phone = prompt("Teléfono (opcional)")?;
            wizard.enter_details(ContactInfo {
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
                phone: match phone.trim() {
                    "" => None,
                    p => Some(p.to_string()),
                },
            })?;
        }

        // Step 6: submit.
        let request = wizard.begin_submit()?;
        println!(
            "\nEnviando reserva para el {} a las {}...",
            request.appointment_date, request.appointment_time
        );
        let outcome = provider.submit_booking(&request).await;
        let refetch = wizard.complete_submit(outcome);

        match wizard.step().clone() {
            WizardStep::Success(confirmation) => {
                println!("\n¡Reserva creada! (turno #{})", confirmation.id);
                println!(
                    "Revisá tu email: tenés unos minutos para confirmar desde el link."
                );
                return Ok(());
            }
            WizardStep::SelectSlot => {
                // Server rejected the booking; its message was printed from
                // the notice and the slot list is being refreshed.
                if let Some(query) = refetch {
                    wizard.load_slots(provider, query).await;
                }
            }
            WizardStep::Failed(message) => {
                println!("\n{message}");
                wizard.retry();
            }
            other => return Err(anyhow!("Estado inesperado del asistente: {:?}", other)),
        }
    }
}

fn pick_date(today: NaiveDate) -> Result<NaiveDate> {
    let mut grid = MonthGrid::for_today(today);
    loop {
        println!("\n{}", grid.title());
        println!("  {}", DAY_NAMES.join("  "));
        for week in grid.weeks() {
            let row: Vec<String> = week
                .iter()
                .map(|cell| {
                    if !cell.in_month {
                        "  · ".to_string()
                    } else if cell.selectable {
                        format!(" {:>2} ", cell.date.day())
                    } else {
                        format!(" {:>2}x", cell.date.day())
                    }
                })
                .collect();
            println!("  {}", row.join(" "));
        }
        println!("(n = mes siguiente, p = mes anterior, o número de día)");

        let input = prompt("Día")?;
        match input.trim() {
            "n" => grid = grid.next_month(),
            "p" => grid = grid.prev_month(),
            raw => {
                let day: u32 = match raw.parse() {
                    Ok(day) => day,
                    Err(_) => {
                        println!("Entrada inválida.");
                        continue;
                    }
                };
                let candidate = grid
                    .cells()
                    .iter()
                    .find(|cell| cell.in_month && cell.date.day() == day)
                    .copied();
                match candidate {
                    Some(cell) if cell.selectable => return Ok(cell.date),
                    Some(_) => println!("Ese día no está disponible (fin de semana o pasado)."),
                    None => println!("Ese día no pertenece al mes mostrado."),
                }
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn prompt_i64(label: &str) -> Result<i64> {
    let raw = prompt(label)?;
    raw.trim().parse().context("Se esperaba un número")
}

fn prompt_index(label: &str, len: usize) -> Result<usize> {
    loop {
        let raw = prompt(label)?;
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= len => return Ok(n - 1),
            _ => println!("Elegí un número entre 1 y {len}."),
        }
    }
}
