//! Command parsing and rendering for the interactive shell.

use std::str::FromStr;

use anyhow::{Context, Result, bail};

use ranger_core::app::EditorSession;
use ranger_core::domain::{
    ActionId, ActionPatch, Brush, Color, Hand, MixId, MixPatch, Weight,
};
use ranger_core::impls::FileStore;
use ranger_core::library::TreeNode;

const HELP: &str = "\
Commands:
  actions                          - List actions
  action add                       - Create an action
  action rename <action> <name>    - Rename an action
  action color <action> <#rrggbb>  - Recolor an action
  action rm <action>               - Delete an action and its references
  mixes                            - List mixes
  mix add                          - Create a mix
  mix set <mix> <action> [<action> <weight>]
  mix rm <mix>                     - Delete a mix
  brush <action|mix|none>          - Select the paint source
  click <hand>                     - Toggle one hand
  drag <hand> <hand>...            - Paint a stroke across hands
  grid                             - Show the 13x13 grid
  reset                            - Clear every hand
  tree                             - Show the library
  folder <name>                    - Create a folder under the selection
  save <name>                      - Save the grid as a leaf under the selection
  rename <node> <name>             - Rename a folder or leaf
  rm <node>                        - Delete a folder or leaf
  mv <node> [<over>]               - Move a node (no target: end of root)
  load <leaf>                      - Load a saved decision set
  select <node|none>               - Set the insertion parent
  status                           - Show counts and coverage
  quit / q                         - Save and exit";

pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    session: EditorSession<FileStore>,
}

impl Shell {
    pub fn new(session: EditorSession<FileStore>) -> Self {
        Self { session }
    }

    pub fn print_warnings(&mut self) {
        for warning in self.session.take_warnings() {
            println!("warning: {}", warning.message);
        }
    }

    pub fn close(self) {
        self.session.close();
    }

    pub fn run(&mut self, line: &str) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["quit" | "q"] => return Ok(Flow::Quit),
            ["help" | "h"] => println!("{HELP}"),

            ["actions"] => self.print_actions(),
            ["action", "add"] => {
                let id = self.session.add_action();
                println!("created {id}");
            }
            ["action", "rename", action, name @ ..] => {
                let id = self.action(action)?;
                self.session.update_action(id, ActionPatch::name(name.join(" ")));
            }
            ["action", "color", action, color] => {
                let id = self.action(action)?;
                let color: Color = color.parse()?;
                self.session.update_action(id, ActionPatch::color(color));
            }
            ["action", "rm", action] => {
                let id = self.action(action)?;
                self.session.delete_action(id);
            }

            ["mixes"] => self.print_mixes(),
            ["mix", "add"] => {
                let id = self.session.add_mix();
                println!("created {id}");
            }
            ["mix", "set", mix, first] => {
                let patch = MixPatch {
                    first: Some(self.action(first)?),
                    second: Some(None),
                    weight: None,
                };
                self.session.update_mix(parse_id(mix)?, patch);
            }
            ["mix", "set", mix, first, second, weight] => {
                let weight = weight.parse::<u32>().context("weight must be a number")?;
                let patch = MixPatch {
                    first: Some(self.action(first)?),
                    second: Some(Some(self.action(second)?)),
                    weight: Some(Weight::new(weight)?),
                };
                self.session.update_mix(parse_id(mix)?, patch);
            }
            ["mix", "rm", mix] => {
                self.session.delete_mix(parse_id(mix)?);
            }

            ["brush", "none"] => {
                self.session.set_active_brush(None);
            }
            ["brush", target] => {
                let brush = match target.parse::<MixId>() {
                    Ok(id) if target.starts_with("mix-") => Brush::Mix(id),
                    _ => Brush::Simple(self.action(target)?),
                };
                self.session.set_active_brush(Some(brush));
            }
            ["click", hand] => {
                let hand = parse_hand(hand)?;
                if !self.session.click(hand) {
                    println!("nothing painted (no brush?)");
                }
            }
            ["drag", first, rest @ ..] => {
                let first = parse_hand(first)?;
                let rest = rest.iter().map(|h| parse_hand(h)).collect::<Result<Vec<_>>>()?;
                self.session.pointer_down(first);
                for hand in rest {
                    self.session.pointer_move(hand);
                }
                if let Some(summary) = self.session.pointer_up() {
                    println!("{:?} {} hand(s)", summary.mode, summary.hands.len());
                }
            }
            ["grid"] => self.print_grid(),
            ["reset"] => self.session.reset_grid(),

            ["tree"] => self.print_tree(),
            ["folder", name @ ..] => {
                if let Some(id) = self.session.create_folder(&name.join(" ")) {
                    println!("created {id}");
                }
            }
            ["save", name @ ..] => {
                if let Some(id) = self.session.create_leaf(&name.join(" ")) {
                    println!("saved {id}");
                }
            }
            ["rename", node, name @ ..] => {
                self.session.rename(parse_id(node)?, &name.join(" "));
            }
            ["rm", node] => {
                self.session.delete(parse_id(node)?);
            }
            ["mv", node] => {
                self.session.move_node(parse_id(node)?, None);
            }
            ["mv", node, over] => {
                self.session.move_node(parse_id(node)?, Some(parse_id(over)?));
            }
            ["load", node] => {
                if !self.session.load_leaf(parse_id(node)?) {
                    println!("no such leaf");
                }
            }
            ["select", "none"] => {
                self.session.select(None);
            }
            ["select", node] => {
                self.session.select(Some(parse_id(node)?));
            }
            ["status"] => self.print_status(),

            _ => bail!("unknown command `{line}` (try `help`)"),
        }
        Ok(Flow::Continue)
    }

    /// Resolves an action by id or (case-insensitive) name.
    fn action(&self, word: &str) -> Result<ActionId> {
        if let Ok(id) = word.parse::<ActionId>() {
            return Ok(id);
        }
        match self.session.actions().find_by_name(word) {
            Some(action) => Ok(action.id),
            None => bail!("no action named `{word}`"),
        }
    }

    fn print_actions(&self) {
        let brush = self.session.active_brush();
        for action in self.session.actions().iter() {
            let mark = if brush == Some(Brush::Simple(action.id)) { "*" } else { " " };
            println!("{mark} {} {} {}", action.id, action.color, action.name);
        }
    }

    fn print_mixes(&self) {
        let actions = self.session.actions();
        let name = |id: ActionId| actions.get(id).map_or("?", |a| a.name.as_str());
        for mix in self.session.mixes() {
            let mark = if self.session.active_brush() == Some(Brush::Mix(mix.id)) { "*" } else { " " };
            let parts: Vec<String> = mix
                .entries()
                .iter()
                .map(|e| format!("{} {}%", name(e.action_id), e.weight.get()))
                .collect();
            println!("{mark} {} {}", mix.id, parts.join(" / "));
        }
    }

    /// Each cell shows the hand and the initial of its heaviest action.
    fn print_grid(&self) {
        let actions = self.session.actions();
        let freqs = self.session.frequencies();
        for row in 0..13 {
            let cells: Vec<String> = (0..13)
                .filter_map(|col| Hand::at(row, col))
                .map(|hand| {
                    let mark = freqs
                        .get(hand)
                        .and_then(|entries| entries.iter().max_by_key(|e| e.weight.get()))
                        .and_then(|e| actions.get(e.action_id))
                        .and_then(|a| a.name.chars().next())
                        .unwrap_or('.');
                    format!("{:<3}{mark}", hand.to_string())
                })
                .collect();
            println!("{}", cells.join(" "));
        }
    }

    fn print_tree(&self) {
        let selected = self.session.selected();
        let loaded = self.session.loaded();
        for (depth, node) in self.session.tree().walk() {
            let indent = "  ".repeat(depth);
            let kind = match node {
                TreeNode::Folder(_) => "+",
                TreeNode::Leaf(_) => "-",
            };
            let mut flags = String::new();
            if selected == Some(node.id()) {
                flags.push_str(" [selected]");
            }
            if loaded == Some(node.id()) {
                flags.push_str(" [loaded]");
            }
            println!("{indent}{kind} {} {}{flags}", node.name(), node.id());
        }
    }

    fn print_status(&self) {
        let status = self.session.status();
        println!(
            "actions={} mixes={} painted={} folders={} leaves={}",
            status.actions, status.mixes, status.painted_hands, status.folders, status.leaves
        );
        for c in &status.coverage {
            println!("  {:>6.2}% {}", c.percent, c.name);
        }
    }
}

fn parse_hand(word: &str) -> Result<Hand> {
    Ok(word.parse()?)
}

fn parse_id<T>(word: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse().with_context(|| format!("bad id `{word}`"))
}
