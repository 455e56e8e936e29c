use anyhow::{anyhow, Result};
use tracing::{debug, instrument};
use xcb::{
    x::{self, Atom, GetProperty, InternAtom, Window, ATOM_ANY},
    Connection,
};

use super::{contains_title, InstanceGuard};

fn intern_atom(conn: &Connection, name: &[u8]) -> Result<Atom> {
    let reply = conn.wait_for_reply(conn.send_request(&InternAtom {
        only_if_exists: false,
        name,
    }))?;
    Ok(reply.atom())
}

/// Top-level windows managed by the window manager.
fn get_client_list(
    conn: &Connection,
    root: Window,
    client_list_atom: Atom,
) -> Result<Vec<Window>> {
    let result = conn.wait_for_reply(conn.send_request(&GetProperty {
        delete: false,
        window: root,
        property: client_list_atom,
        r#type: ATOM_ANY,
        long_offset: 0,
        long_length: 4096,
    }))?;
    Ok(result.value::<Window>().to_vec())
}

pub fn get_name(conn: &Connection, window: Window, wm_name_atom: Atom) -> Result<String> {
    let wm_name = conn.wait_for_reply(conn.send_request(&x::GetProperty {
        delete: false,
        window,
        property: wm_name_atom,
        r#type: x::ATOM_ANY,
        long_offset: 0,
        long_length: 1024,
    }))?;
    Ok(String::from_utf8_lossy(wm_name.value::<u8>()).into_owned())
}

/// Looks for the title among `_NET_CLIENT_LIST` of the preferred screen.
pub struct X11InstanceGuard {
    connection: Connection,
    preferred_screen: i32,
    client_list_atom: Atom,
    window_name_atom: Atom,
    title: String,
}

impl X11InstanceGuard {
    pub fn new(title: &str) -> Result<Self> {
        let (connection, preferred_screen) = xcb::Connection::connect(None)?;
        let client_list_atom = intern_atom(&connection, b"_NET_CLIENT_LIST")?;
        let window_name_atom = intern_atom(&connection, b"_NET_WM_NAME")?;
        Ok(Self {
            connection,
            preferred_screen,
            client_list_atom,
            window_name_atom,
            title: title.to_string(),
        })
    }

    fn client_list(&self) -> Result<Vec<Window>> {
        let setup = self.connection.get_setup();

        // Currently the application only supports 1 x11 screen.
        let root = setup
            .roots()
            .nth(self.preferred_screen.max(0) as usize)
            .ok_or_else(|| anyhow!("Screen {} doesn't exist", self.preferred_screen))?
            .root();

        get_client_list(&self.connection, root, self.client_list_atom)
    }
}

impl InstanceGuard for X11InstanceGuard {
    #[instrument(skip(self))]
    fn is_running(&self) -> bool {
        match self.client_list() {
            Ok(windows) => contains_title(
                windows
                    .into_iter()
                    .map(|window| get_name(&self.connection, window, self.window_name_atom)),
                &self.title,
            ),
            Err(e) => {
                debug!("Failed to list windows {e:?}");
                false
            }
        }
    }
}
