use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use estocka_authz::authz::{PermissionResolver, Role, RolePermissionTable};
use estocka_authz::jwt::JwtConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "estocka role and permission tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the permission x role grid
    Matrix,
    /// List the permissions granted to a role
    Grants { role: Role },
    /// Check one permission; exits with 1 when denied
    Check {
        /// Role name as the session would report it; omit for an anonymous user
        #[arg(long)]
        role: Option<String>,
        permission: String,
    },
    /// Validate the role table; exits with 1 on violations
    Validate,
    /// Sign a development session token (needs JWT_SECRET)
    Token {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        sub: Option<Uuid>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();
    let table = RolePermissionTable::global();

    match cli.command {
        Commands::Matrix => print_matrix(table),
        Commands::Grants { role } => {
            for permission in table.permissions_of(role) {
                println!("{}", permission);
            }
        }
        Commands::Check { role, permission } => {
            let resolver = PermissionResolver::new(role);
            let granted = resolver.has_permission(&permission);
            println!(
                "{} {} {}",
                resolver.resolve_role(),
                if granted { "granted" } else { "denied" },
                permission
            );
            if !granted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Validate => {
            let violations = table.validate();
            if violations.is_empty() {
                println!("role table ok");
            } else {
                for violation in &violations {
                    eprintln!("{}", violation);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Token { role, sub } => {
            let jwt = JwtConfig::from_env().context("cannot sign token")?;
            let token = jwt.encode(sub.unwrap_or_else(Uuid::new_v4), Some(role))?;
            println!("{}", token);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_matrix(table: &RolePermissionTable) {
    print!("{:<22}", "permission");
    for role in Role::ALL {
        print!(" {:<9}", role.as_str());
    }
    println!();

    for permission in table.all_permissions() {
        print!("{:<22}", permission);
        for role in Role::ALL {
            let mark = if table.grants(role, permission) { "x" } else { "-" };
            print!(" {:<9}", mark);
        }
        println!();
    }
}
