//! Interactive shell for the Angler engine.
//!
//! Stands in for the messaging transport: reads commands on stdin as a
//! single local user and renders engine replies as text. The engine
//! itself lives in the library and never formats user-facing strings.

use angler::build_info;
use angler::errors::ActionError;
use angler::save_manager::SaveManager;
use angler::service::{GameService, PurchaseKind};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn main() -> io::Result<()> {
    env_logger::init();

    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut data_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("angler {} ({})", build_info::BUILD_DATE, build_info::BUILD_COMMIT);
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Angler - Chat Fishing Game Shell\n");
                println!("Usage: angler [--data <file>]\n");
                println!("Options:");
                println!("  --data <file>  Store the account snapshot at <file>");
                println!("  --version      Show version information");
                println!("  --help         Show this help message");
                std::process::exit(0);
            }
            "--data" if i + 1 < args.len() => {
                data_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'angler --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let store = match data_path {
        Some(path) => SaveManager::with_path(path)?,
        None => SaveManager::new()?,
    };
    let service = GameService::new(store)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    // One local user; a real transport would hand us its identities.
    let user_id = std::env::var("ANGLER_USER").unwrap_or_else(|_| "local".to_string());
    let display_name = std::env::var("ANGLER_NAME").unwrap_or_else(|_| "Angler".to_string());

    println!("Angler shell. Type 'help' for commands.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (command, rest) = match parts.split_first() {
            Some((cmd, rest)) => (*cmd, rest.join(" ")),
            None => continue,
        };

        match command {
            "fish" => show_bait_menu(&service, &user_id, &display_name),
            "cast" => do_cast(&service, &user_id, &rest),
            "shop" => show_shop(&service, &user_id),
            "buy" => do_buy(&service, &user_id, &rest),
            "sell" => do_sell(&service, &user_id),
            "coins" => show_coins(&service, &user_id, &display_name),
            "myfish" => show_inventory(&service, &user_id),
            "stats" => show_stats(&service, &user_id),
            "leaderboard" => show_leaderboard(&service),
            "help" => show_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command: {}. Type 'help'.", other),
        }
    }

    Ok(())
}

fn show_bait_menu(service: &GameService, user_id: &str, display_name: &str) {
    let start = service.start_action(user_id, display_name);
    if start.rejected {
        println!(
            "You've reached your rod limit! Try again in {} min.",
            start.wait_minutes.unwrap_or(0)
        );
        return;
    }
    println!("Choose your bait (cast <bait>):");
    for choice in &start.available_baits {
        println!("  {} ({})", choice.name, choice.owned);
    }
}

fn do_cast(service: &GameService, user_id: &str, bait: &str) {
    if bait.is_empty() {
        println!("Usage: cast <bait>");
        return;
    }
    match service.resolve_action(user_id, bait) {
        Ok(outcome) => {
            println!(
                "You used {} and caught a {} {} {}!",
                bait,
                outcome.tier.label(),
                outcome.glyph,
                outcome.species
            );
            println!(
                "Weight: {} kg | Length: {} cm",
                outcome.weight, outcome.length
            );
            println!(
                "Points: {} | Coins: {}",
                outcome.score_delta, outcome.coins_delta
            );
            if outcome.bonus {
                println!("Trophy catch! +25 pts, +10 coins!");
            }
        }
        Err(e) => print_action_error(&e),
    }
}

fn show_shop(service: &GameService, user_id: &str) {
    if let Some(account) = service.account_summary(user_id) {
        println!("You currently have the {} equipped.", account.rod);
    }
    let offers = service.list_shop_offers(user_id);
    println!("Shop options (buy bait <name> / buy rod <name>):");
    for bait in &offers.baits {
        println!("  Bait: {} ({} coins)", bait.name, bait.price);
    }
    for rod in &offers.rods {
        println!(
            "  Rod: {} ({} coins) - +{} fish/hr",
            rod.name, rod.price, rod.quota_bonus
        );
    }
    if offers.sellable_fish > 0 {
        println!("  Sell all fish ({}) with 'sell'", offers.sellable_fish);
    }
}

fn do_buy(service: &GameService, user_id: &str, rest: &str) {
    let (kind, name) = match rest.split_once(' ') {
        Some(("bait", name)) => (PurchaseKind::Bait, name),
        Some(("rod", name)) => (PurchaseKind::Rod, name),
        _ => {
            println!("Usage: buy bait <name> | buy rod <name>");
            return;
        }
    };
    match service.purchase(user_id, kind, name) {
        Ok(balance) => println!("You bought {}. You now have {} coins.", name, balance),
        Err(e) => print_action_error(&e),
    }
}

fn do_sell(service: &GameService, user_id: &str) {
    match service.sell_all(user_id) {
        Ok(report) => println!(
            "You sold {} fish for {} coins!",
            report.sold, report.coins_earned
        ),
        Err(e) => print_action_error(&e),
    }
}

fn show_coins(service: &GameService, user_id: &str, display_name: &str) {
    // Seeing your balance should work before the first cast.
    service.start_action(user_id, display_name);
    if let Some(account) = service.account_summary(user_id) {
        println!("You have {} coins.", account.coins);
    }
}

fn show_inventory(service: &GameService, user_id: &str) {
    let Some(account) = service.account_summary(user_id) else {
        println!("You have no fish.");
        return;
    };
    if account.caught.is_empty() {
        println!("You have no fish.");
        return;
    }
    println!("Your fish inventory:");
    for fish in &account.caught {
        println!(
            "  {} {} ({}) - {} coins",
            fish.glyph,
            fish.species,
            fish.rarity.label(),
            fish.value
        );
    }
}

fn show_stats(service: &GameService, user_id: &str) {
    let Some(account) = service.account_summary(user_id) else {
        println!("No account yet. Go fish!");
        return;
    };
    match serde_json::to_string_pretty(&account) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("Could not render account: {}", e),
    }
}

fn show_leaderboard(service: &GameService) {
    let rows = service.leaderboard(10);
    if rows.is_empty() {
        println!("Nobody has fished yet.");
        return;
    }
    println!("Leaderboard:");
    for (i, row) in rows.iter().enumerate() {
        let title = match i {
            0 => " \u{1F3C6} Champion",
            1 => " \u{1F948} Master",
            2 => " \u{1F949} Pro",
            _ => "",
        };
        println!("{}. {}: {} pts{}", i + 1, row.display_name, row.score, title);
    }
}

fn show_help() {
    println!("Angler commands:");
    println!("  fish         Start fishing (list your baits)");
    println!("  cast <bait>  Cast with a bait");
    println!("  shop         Buy bait and rods, see sellable fish");
    println!("  buy bait <name> / buy rod <name>");
    println!("  sell         Sell all fish");
    println!("  coins        Check your coin balance");
    println!("  myfish       View your caught fish");
    println!("  stats        Full account summary");
    println!("  leaderboard  Top players");
    println!("  quit         Leave the shell");
}

fn print_action_error(error: &ActionError) {
    match error {
        ActionError::QuotaExceeded { wait_minutes } => println!(
            "You've reached your rod limit! Try again in {} min.",
            wait_minutes
        ),
        ActionError::InsufficientFunds { .. } => println!("Not enough coins!"),
        ActionError::InsufficientStock { .. } => println!("You're out of that bait!"),
        ActionError::UnknownItem { name } => println!("No such item: {}", name),
        ActionError::Persistence(_) => {
            println!("Could not save your progress; the action was not applied.")
        }
    }
}
