// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// What an inbound text message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Show usage
    Help,
    // Run the open-ticket report for the requesting chat
    Report,
    // Look up every ticket id mentioned in the text
    Lookup(String),
}

impl Command {
    /// Parse the text of an inbound message.
    ///
    /// Slash commands may carry a bot mention (`/report@sqm_bot`). Unknown
    /// slash commands and plain text both fall through to [`Command::Lookup`],
    /// so `/cek INC1` still finds the ticket.
    pub fn parse(input: &str) -> Command {
        let input = input.trim();

        let word = input.split_whitespace().next().unwrap_or("");

        let Some(command) = word.strip_prefix('/') else {
            return Command::Lookup(input.to_string());
        };
        let command = command
            .split_once('@')
            .map(|(c, _bot)| c)
            .unwrap_or(command)
            .to_ascii_lowercase();

        match command.as_str() {
            "start" | "help" => Command::Help,
            "report" | "laporan" => Command::Report,
            _ => Command::Lookup(input.to_string()),
        }
    }
}

/// Usage text sent for [`Command::Help`].
pub fn help_text(id_prefix: &str, threshold: f64) -> String {
    format!(
        "🤖 <b>SQM Ticket Bot</b>\n\
         Kirim nomor tiket (contoh: <code>{prefix}12345</code>) untuk melihat detailnya.\n\
         /report — tiket OPEN dengan umur &lt; {threshold} jam\n\
         /help — tampilkan pesan ini",
        prefix = sqm_core::format::escape_html(&id_prefix.to_uppercase()),
    )
}

/// Reply for a message that mentions no ticket id.
pub fn no_ids_hint(id_prefix: &str) -> String {
    format!(
        "Tidak ada nomor tiket dalam pesan. Contoh: <code>{}12345</code>",
        sqm_core::format::escape_html(&id_prefix.to_uppercase())
    )
}
