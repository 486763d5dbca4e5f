use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub heading: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub accent: fn(&str) -> String,
    pub ok: fn(&str) -> String,
    pub warn: fn(&str) -> String,
    pub danger: fn(&str) -> String,
    pub info: fn(&str) -> String,
    pub muted: fn(&str) -> String,
    pub line: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "depot" | "" => Self::depot(),
            "nightline" => Self::nightline(),
            "paper" => Self::paper(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::depot() // Fallback to default
            }
        }
    }

    /// Map the API's badge class hints onto theme styles.
    pub fn badge(&self, class: &str) -> fn(&str) -> String {
        match class {
            "badge-success" => self.ok,
            "badge-warning" => self.warn,
            "badge-danger" => self.danger,
            "badge-info" => self.info,
            _ => self.value,
        }
    }

    fn depot() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().underline().to_string(),
            heading: |s| s.bright_white().bold().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.white().to_string(),
            accent: |s| s.bright_cyan().bold().to_string(),
            ok: |s| s.green().to_string(),
            warn: |s| s.yellow().to_string(),
            danger: |s| s.red().bold().to_string(),
            info: |s| s.blue().to_string(),
            muted: |s| s.bright_black().dimmed().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
        }
    }

    fn nightline() -> Self {
        Self {
            title: |s| s.bright_blue().italic().bold().underline().to_string(),
            heading: |s| s.bright_cyan().bold().to_string(),
            label: |s| s.normal().to_string(),
            value: |s| s.bright_white().to_string(),
            accent: |s| s.bright_yellow().to_string(),
            ok: |s| s.bright_green().to_string(),
            warn: |s| s.bright_yellow().to_string(),
            danger: |s| s.bright_red().bold().to_string(),
            info: |s| s.bright_blue().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
        }
    }

    fn paper() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            heading: |s| s.black().bold().to_string(),
            label: |s| s.bright_cyan().to_string(),
            value: |s| s.black().to_string(),
            accent: |s| s.magenta().to_string(),
            ok: |s| s.green().to_string(),
            warn: |s| s.yellow().bold().to_string(),
            danger: |s| s.red().bold().to_string(),
            info: |s| s.cyan().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
        }
    }
}
