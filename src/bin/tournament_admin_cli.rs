// src/bin/tournament_admin_cli.rs

use clap::{Parser, Subcommand};

use tournament_engine::api::{Actor, ApiError, BracketViewDto, TournamentService};
use tournament_engine::config::AppConfig;
use tournament_engine::domain::{normalize_code, CodeStatus};
use tournament_engine::telemetry;

#[derive(Parser)]
#[command(name = "tournament_admin_cli")]
#[command(about = "Админ-операции турнира поверх каталога с JSON-документами")]
struct Args {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Сводка турнира
    Status,

    /// Отобрать команды на турнир
    Select {
        /// Сколько команд отобрать (по умолчанию из конфига)
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Сгенерировать сетку по текущему отбору
    Bracket,

    /// Объявить победителя
    Winner { team_id: String },

    /// Удалить устаревшие приглашения
    Cleanup,

    /// Показать пул промокодов
    Codes,

    /// Проверить промокод без погашения
    Check { code: String },
}

fn main() {
    telemetry::init();
    let args = Args::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ошибка конфигурации: {e}");
            std::process::exit(2);
        }
    };

    let mut service = match TournamentService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Не удалось открыть хранилище: {e}");
            std::process::exit(1);
        }
    };

    // CLI действует от имени первого администратора из конфига.
    let Some(&admin_id) = config.admin_ids.first() else {
        eprintln!("Не задан ни один администратор");
        std::process::exit(2);
    };
    let admin = Actor::new(admin_id, "admin_cli", "Admin CLI");

    if let Err(e) = run(&mut service, &admin, args.command) {
        eprintln!("Ошибка: {e}");
        std::process::exit(1);
    }
}

fn run<S, R>(
    service: &mut TournamentService<S, R>,
    admin: &Actor,
    command: AdminCommand,
) -> Result<(), ApiError>
where
    S: tournament_engine::infra::DocumentStore,
    R: tournament_engine::engine::RandomSource,
{
    match command {
        AdminCommand::Status => {
            let stats = service.admin_stats(admin)?;
            let status = &stats.status;
            println!("=== СТАТУС ТУРНИРА ===");
            println!("Зарегистрировано команд: {}", status.registered_teams);
            println!("  из них без второго игрока: {}", status.incomplete_teams);
            println!("Отобрано команд: {}", status.selected_teams);
            println!("Активировано игроков: {}", status.activated_players);
            println!("Соло-анкет: {}", status.solo_profiles);
            println!("Ожидающих приглашений: {}", stats.pending_invites);
            println!(
                "Сетка: {}",
                if status.bracket_generated { "сгенерирована" } else { "нет" }
            );
            match &status.winner {
                Some(team_id) => println!("Победитель: команда {team_id}"),
                None => println!("Победитель: не объявлен"),
            }
        }

        AdminCommand::Select { count } => {
            let report = service.select_teams(admin, count)?;
            println!("Отобрано {} команд:", report.selected.len());
            for (i, listing) in report.selected.iter().enumerate() {
                println!(
                    "  {}. {} (id={}, MMR {})",
                    i + 1,
                    listing.team.name,
                    listing.team_id,
                    listing.team.mmr
                );
            }
            println!(
                "Уведомлено капитанов: {} из {}",
                report.notifications.delivered,
                report.notifications.attempted()
            );
        }

        AdminCommand::Bracket => {
            let view = service.build_bracket(admin)?;
            print_bracket(&view);
        }

        AdminCommand::Winner { team_id } => {
            let report = service.declare_winner(admin, &team_id)?;
            println!("🏆 Победитель: {} (id={})", report.team.team.name, report.team.team_id);
            println!("Дата: {}", report.winner.date);
        }

        AdminCommand::Cleanup => {
            let removed = service.purge_stale_invites(admin)?;
            println!("Удалено приглашений: {removed}");
        }

        AdminCommand::Codes => {
            service.ensure_code_pool()?;
            let codes = service.promo_codes(admin)?;
            let used = codes.iter().filter(|c| c.redeemed).count();
            for code in &codes {
                let mark = if code.redeemed { "использован" } else { "свободен" };
                println!("{}  {}", code.code, mark);
            }
            println!("Всего: {}, использовано: {}", codes.len(), used);
        }

        AdminCommand::Check { code } => {
            service.ensure_code_pool()?;
            let status = match service.check_code(&code) {
                CodeStatus::Valid => "действителен",
                CodeStatus::Used => "уже использован",
                CodeStatus::NotFound => "не найден",
            };
            println!("Промокод {}: {status}", normalize_code(&code));
        }
    }

    Ok(())
}

fn print_bracket(view: &BracketViewDto) {
    println!("=== ТУРНИРНАЯ СЕТКА ===");
    for m in &view.matches {
        let name = |id: &str, listing: &Option<tournament_engine::domain::TeamListing>| {
            listing
                .as_ref()
                .map(|l| l.team.name.clone())
                .unwrap_or_else(|| format!("id={id}"))
        };
        println!(
            "Матч {} (раунд {}): {} vs {}",
            m.match_id,
            m.round,
            name(&m.team1_id, &m.team1),
            name(&m.team2_id, &m.team2)
        );
    }
    if let Some(team_id) = &view.unpaired {
        println!("Без пары: команда {team_id}");
    }
}
