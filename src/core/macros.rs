#[macro_export]
macro_rules! build_key_bindings(
    { $( $binding:expr => $action:expr, )+ } => {
        {
            let keycodes = $crate::util::Util::system_keycodes();
            let mut key_bindings = $crate::binding::KeyBindings::new();

            $(
                match $crate::util::Util::parse_key_binding($binding, &keycodes) {
                    None => panic!("could not parse key binding: {}", $binding),
                    Some(key_code) => key_bindings.push($crate::binding::KeyBinding {
                        key_code,
                        action: $action,
                    }),
                };
            )+

            key_bindings
        }
    };
);

#[macro_export]
macro_rules! build_button_bindings(
    { $( $binding:expr => $action:expr, )+ } => {
        {
            let mut button_bindings = $crate::binding::ButtonBindings::new();

            $(
                match $crate::util::Util::parse_button_binding($binding) {
                    None => panic!("could not parse button binding: {}", $binding),
                    Some(button_code) => button_bindings.push($crate::binding::ButtonBinding {
                        button_code,
                        action: $action,
                    }),
                };
            )+

            button_bindings
        }
    };
);
