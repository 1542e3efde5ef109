//! PowerShell snippets for registering the daily upload with the Windows
//! Task Scheduler. Pure string templating: nothing here runs a command.

use chatlog_types::parse_hhmm;

pub const TASK_NAME: &str = "ChatGPT-Logger-Upload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Create {
        upload_time: String,
        script_path: String,
    },
    Remove,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskCommandError {
    #[error("Invalid action")]
    InvalidAction,

    #[error("uploadTime and scriptPath are required to create the task")]
    MissingCreateArgs,

    #[error("Invalid uploadTime '{0}', expected HH:MM")]
    InvalidTime(String),
}

impl TaskCommand {
    /// Validate an action tag and its arguments.
    pub fn parse(
        action: &str,
        upload_time: Option<&str>,
        script_path: Option<&str>,
    ) -> Result<Self, TaskCommandError> {
        match action {
            "create" => {
                let upload_time = upload_time
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or(TaskCommandError::MissingCreateArgs)?;
                let script_path = script_path
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or(TaskCommandError::MissingCreateArgs)?;

                if parse_hhmm(upload_time).is_none() {
                    return Err(TaskCommandError::InvalidTime(upload_time.to_string()));
                }

                Ok(TaskCommand::Create {
                    upload_time: upload_time.to_string(),
                    script_path: script_path.to_string(),
                })
            }
            "remove" => Ok(TaskCommand::Remove),
            "status" => Ok(TaskCommand::Status),
            _ => Err(TaskCommandError::InvalidAction),
        }
    }

    pub fn powershell(&self) -> String {
        match self {
            TaskCommand::Create {
                upload_time,
                script_path,
            } => [
                format!(
                    "$action = New-ScheduledTaskAction -Execute \"python\" -Argument \"{}\"",
                    escape(script_path)
                ),
                format!(
                    "$trigger = New-ScheduledTaskTrigger -Daily -At \"{}\"",
                    upload_time
                ),
                "$settings = New-ScheduledTaskSettingsSet -AllowStartIfOnBatteries \
                 -DontStopIfGoingOnBatteries -StartWhenAvailable"
                    .to_string(),
                "$principal = New-ScheduledTaskPrincipal -UserId \"$env:USERNAME\" \
                 -LogonType Interactive"
                    .to_string(),
                format!(
                    "Register-ScheduledTask -TaskName \"{}\" -Action $action -Trigger $trigger \
                     -Settings $settings -Principal $principal -Force",
                    TASK_NAME
                ),
            ]
            .join("\n"),
            TaskCommand::Remove => {
                format!("Unregister-ScheduledTask -TaskName \"{}\" -Confirm:$false", TASK_NAME)
            }
            TaskCommand::Status => format!(
                "Get-ScheduledTask -TaskName \"{}\" -ErrorAction SilentlyContinue",
                TASK_NAME
            ),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TaskCommand::Create { .. } => "PowerShell command generated for Windows Task Scheduler",
            TaskCommand::Remove => "PowerShell command generated to remove scheduled task",
            TaskCommand::Status => "PowerShell command generated to check task status",
        }
    }
}

/// Escape a value for a double-quoted PowerShell string.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '`' | '"' | '$') {
            out.push('`');
        }
        out.push(c);
    }
    out
}
