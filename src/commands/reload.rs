use anyhow::Result;
use colored::Colorize;
use tracing::info;

#[cfg(unix)]
use stellarview_site::signals::send_reload_signal;

/// Execute the reload command
///
/// Sends SIGHUP to the running server, which re-reads its configuration
/// file and swaps in the phone number and price list without restarting.
pub fn execute(pid: u32) -> Result<()> {
    #[cfg(not(unix))]
    {
        let _ = pid;
        anyhow::bail!("Reload command is not supported on this platform");
    }

    #[cfg(unix)]
    {
        println!(
            "{} {}",
            "Reloading configuration".yellow(),
            format!("(PID: {})", pid).cyan()
        );

        send_reload_signal(pid)?;

        println!("{}", "  Reload signal sent successfully".green());
        println!(
            "  {}",
            "Note: Check server logs to verify reload succeeded".dimmed()
        );
        info!("SIGHUP sent to PID {}", pid);

        Ok(())
    }
}
