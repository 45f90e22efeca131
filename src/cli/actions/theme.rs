use crate::{app::App, theme::Theme};
use anyhow::{Result, bail};

#[derive(Debug)]
pub enum Command {
    List,
    Show { name: Option<String> },
    Set { name: String },
    Next,
    Previous,
}

fn print_palette(theme: &Theme) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(theme)?);
    Ok(())
}

/// Runs a theme command. Only the preference file is touched.
///
/// # Errors
/// Returns an error for an unknown theme name.
pub fn execute(app: &App, command: &Command) -> Result<()> {
    let themes = &app.theme;
    match command {
        Command::List => {
            let active = themes.current_theme();
            for theme in themes.all_themes() {
                let marker = if theme.slug == active { '*' } else { ' ' };
                println!("{marker} {:<20} {}", theme.slug, theme.description);
            }
        }
        Command::Show { name } => print_palette(themes.theme_config(name.as_deref()))?,
        Command::Set { name } => {
            if !themes.set_theme(name) {
                bail!("unknown theme: {name}");
            }
            println!("{}", themes.current_theme());
        }
        Command::Next => println!("{}", themes.next_theme()),
        Command::Previous => println!("{}", themes.previous_theme()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Command, execute};
    use crate::{api::ApiConfig, app::App};
    use anyhow::Result;

    #[test]
    fn set_rejects_unknown_theme() -> Result<()> {
        let app = App::in_memory(ApiConfig::default())?;
        let unknown = Command::Set {
            name: "neon-dreams".to_string(),
        };
        assert!(execute(&app, &unknown).is_err());
        assert_eq!(app.theme.current_theme(), "default");

        let known = Command::Set {
            name: "forest-tech".to_string(),
        };
        assert!(execute(&app, &known).is_ok());
        assert_eq!(app.theme.current_theme(), "forest-tech");
        Ok(())
    }

    #[test]
    fn next_and_previous_cycle() -> Result<()> {
        let app = App::in_memory(ApiConfig::default())?;
        execute(&app, &Command::Previous)?;
        assert_eq!(app.theme.current_theme(), "ocean-depth");
        execute(&app, &Command::Next)?;
        assert_eq!(app.theme.current_theme(), "default");
        Ok(())
    }
}
