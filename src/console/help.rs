//! Help text for `help` and `help <topic>`.

const DOCUMENTED: &[&str] = &[
    "EOF", "all", "count", "create", "destroy", "help", "quit", "show", "update",
];

/// The command list printed by a bare `help`.
pub fn overview() -> String {
    let header = "Documented commands (type help <topic>):";
    format!(
        "\n{}\n{}\n{}\n",
        header,
        "=".repeat(header.len()),
        DOCUMENTED.join("  ")
    )
}

pub fn topic(name: &str) -> Option<&'static str> {
    let text = match name {
        "create" => "Usage: create <classname>\n\nCreates a new <classname> instance, saves it and prints its id\n",
        "show" => "Usage: show <classname> <id>\n\nPrints the string representation of an instance\n",
        "destroy" => "Usage: destroy <classname> <id>\n\nDeletes an instance based on the <classname> and <id>\n",
        "all" => "Usage: all [<classname>]\n\nPrints a list of all instances, or of the instances of <classname>\n",
        "count" => "Usage: count <classname>\n\nPrints the number of instances of <classname>\n",
        "update" => concat!(
            "Usage: update <classname> <id> <attribute> <value>\n",
            "       <classname>.update(\"<id>\", \"<attribute>\", <value>)\n",
            "       <classname>.update(\"<id>\", {\"<attribute>\": <value>, ...})\n",
            "\nSets an attribute on an instance and saves it. Quote values that contain spaces\n",
        ),
        "help" => "To get help on a command, type help <topic>\n",
        "quit" => "Quit command to exit the program\n",
        "EOF" => "Exits the program at end of input\n",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_documented_command_has_a_topic() {
        for name in DOCUMENTED {
            assert!(topic(name).is_some(), "missing help for {}", name);
        }
    }
}
