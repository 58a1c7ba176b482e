use std::path::Path;

/// `.desktop` file for the XDG autostart directory.
pub(crate) fn desktop_entry_contents(app_name: &str, exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={app_name}\n\
         Comment=Resume an interrupted reading session\n\
         Exec={exec}\n\
         Terminal=false\n\
         X-GNOME-Autostart-enabled=true\n",
        exec = quote_exec_argument(&exe.to_string_lossy()),
    )
}

/// LaunchAgent property list that starts `exe` at login.
pub(crate) fn launch_agent_plist(label: &str, exe: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <false/>
</dict>
</plist>
"#,
        label = escape_xml(label),
        exe = escape_xml(&exe.to_string_lossy()),
    )
}

/// Value stored under the `Run` registry key.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) fn registry_command(exe: &Path) -> String {
    format!("\"{}\"", exe.display())
}

// Desktop Entry spec: arguments with reserved characters are double-quoted and
// `"`, `` ` ``, `$` and `\` are backslash-escaped inside the quotes.
fn quote_exec_argument(arg: &str) -> String {
    const RESERVED: &[char] = &[
        ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(',
        ')', '`',
    ];
    if !arg.contains(RESERVED) {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for character in arg.chars() {
        if matches!(character, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(character);
    }
    quoted.push('"');
    quoted
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_entry_points_at_executable_without_arguments() {
        let contents = desktop_entry_contents("pagelock", Path::new("/usr/bin/pagelock"));
        assert!(contents.starts_with("[Desktop Entry]\n"));
        assert!(contents.contains("\nExec=/usr/bin/pagelock\n"));
        assert!(contents.contains("\nX-GNOME-Autostart-enabled=true\n"));
    }

    #[test]
    fn desktop_entry_quotes_paths_with_spaces_and_escapes() {
        let contents =
            desktop_entry_contents("pagelock", Path::new("/opt/my apps/$page\"lock"));
        assert!(contents.contains("\nExec=\"/opt/my apps/\\$page\\\"lock\"\n"));
    }

    #[test]
    fn launch_agent_runs_at_load_and_escapes_path() {
        let plist = launch_agent_plist(
            "com.github.pagelock",
            Path::new("/Applications/R&D/pagelock"),
        );
        assert!(plist.contains("<string>com.github.pagelock</string>"));
        assert!(plist.contains("<string>/Applications/R&amp;D/pagelock</string>"));
        assert!(plist.contains("<key>RunAtLoad</key>\n    <true/>"));
    }

    #[test]
    fn registry_command_is_quoted() {
        assert_eq!(
            registry_command(Path::new("/apps/page lock.exe")),
            "\"/apps/page lock.exe\""
        );
    }
}
