use crate::client::Client;

/// A window rule, applied once when a client is first managed, before
/// its initial state export. The first rule whose class fragment
/// matches wins.
pub struct Rule {
    pub class: &'static str,
    pub workspace: Option<usize>,
    pub bordered: bool,
}

impl Rule {
    pub fn applies_to(
        &self,
        class: &str,
    ) -> bool {
        class.to_lowercase().contains(&self.class.to_lowercase())
    }

    pub fn propagate(
        &self,
        client: &Client,
    ) {
        if let Some(workspace) = self.workspace {
            client.set_workspace(workspace);
        }

        client.set_bordered(self.bordered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winsys::geometry::Region;

    #[test]
    fn matching_is_case_insensitive_on_fragments() {
        let rule = Rule {
            class: "firefox",
            workspace: Some(1),
            bordered: true,
        };

        assert!(rule.applies_to("Firefox"));
        assert!(rule.applies_to("firefox-esr"));
        assert!(!rule.applies_to("chromium"));
    }

    #[test]
    fn propagation_retargets_workspace_and_border() {
        let client = Client::new(1, "mpv", 0, Region::new(0, 0, 100, 100), None);

        let rule = Rule {
            class: "mpv",
            workspace: Some(3),
            bordered: false,
        };

        rule.propagate(&client);

        assert_eq!(client.workspace(), 3);
        assert!(!client.is_bordered());
    }
}
