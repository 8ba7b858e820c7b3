use super::{report, AppContext};
use crate::output::Output;
use crate::{PrefsCommands, ThemeArg};
use color_eyre::Result;
use lunastream_models::{Preferences, PreferencesUpdate, Theme};

pub async fn run(cmd: PrefsCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    let prefs = match cmd {
        PrefsCommands::Show => report(ctx.prefs.get(), output),
        PrefsCommands::Set { theme, welcome_animation, sandbox_protection } => {
            let update = PreferencesUpdate {
                theme: theme.map(|t| match t {
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Dark => Theme::Dark,
                }),
                enable_welcome_animation: welcome_animation,
                enable_sandbox_protection: sandbox_protection,
            };
            if update == PreferencesUpdate::default() {
                output.warn("Nothing to change. Use --theme, --welcome-animation or --sandbox-protection");
            }
            report(ctx.prefs.save(&update), output)
        }
        PrefsCommands::Reset => {
            let prefs = report(ctx.prefs.reset(), output);
            output.success("Preferences reset to defaults");
            prefs
        }
    };

    show(&prefs, output);
    Ok(())
}

fn show(prefs: &Preferences, output: &Output) {
    let theme = match prefs.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let rows = vec![
        vec!["Theme".to_string(), theme.to_string()],
        vec!["Welcome animation".to_string(), prefs.enable_welcome_animation.to_string()],
        vec!["Sandbox protection".to_string(), prefs.enable_sandbox_protection.to_string()],
    ];
    output.table("Preferences", &["Setting", "Value"], rows, prefs);
}
