use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Default reporting threshold in milliseconds.
const DEFAULT_THRESHOLD_MS: u128 = 1;

/// Times a system when the `perf_stats` feature is enabled.
///
/// The body is wrapped in a guard that logs the elapsed time on exit when it
/// exceeds the threshold. If the system takes a `Res<SimTick>` parameter (any
/// name), the guard also logs every 100th tick regardless of duration.
/// Without the feature the function is emitted unchanged.
///
/// ```ignore
/// #[profile]
/// pub fn step_fluid(lattice: ResMut<MapLattice>, tick: Res<SimTick>) { ... }
///
/// #[profile(4)] // report above 4 ms
/// pub fn process_goal_requests(...) { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let threshold_ms = parse_threshold(attr);

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let name = sig.ident.to_string();

    let guard = guard_tokens(&name, threshold_ms, tick_param(sig));

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_guard = { #guard };

            #block
        }
    };
    output.into()
}

fn parse_threshold(attr: TokenStream) -> u128 {
    if attr.is_empty() {
        return DEFAULT_THRESHOLD_MS;
    }
    attr.to_string().trim().parse().unwrap_or(DEFAULT_THRESHOLD_MS)
}

/// Name of the first parameter whose type mentions `SimTick`.
fn tick_param(sig: &Signature) -> Option<Ident> {
    sig.inputs.iter().find_map(|arg| {
        let FnArg::Typed(pat_type) = arg else { return None };
        let Pat::Ident(pat_ident) = &*pat_type.pat else { return None };
        mentions_sim_tick(&pat_type.ty).then(|| pat_ident.ident.clone())
    })
}

fn mentions_sim_tick(ty: &Type) -> bool {
    quote!(#ty).to_string().contains("SimTick")
}

fn guard_tokens(name: &str, threshold_ms: u128, tick: Option<Ident>) -> TokenStream2 {
    let (tick_field, tick_init, tick_check) = match tick {
        Some(tick) => (
            quote! { tick: u64, },
            quote! { tick: #tick.0, },
            quote! { || self.tick % 100 == 0 },
        ),
        None => (quote! {}, quote! {}, quote! {}),
    };

    quote! {
        struct ProfileGuard {
            name: &'static str,
            start: std::time::Instant,
            #tick_field
        }
        impl Drop for ProfileGuard {
            fn drop(&mut self) {
                let elapsed = self.start.elapsed();
                if elapsed.as_millis() > #threshold_ms #tick_check {
                    bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
                }
            }
        }
        ProfileGuard {
            name: #name,
            start: std::time::Instant::now(),
            #tick_init
        }
    }
}
