use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, AttributeArgs, FnArg, ItemFn, Lit, Meta, NestedMeta, Pat, Type,
};
use proc_macro_crate::{crate_name, FoundCrate};

/// Resolve host crate path (equivalent to `$crate`)
fn host_crate() -> proc_macro2::TokenStream {
    match crate_name("gagiteck") {
        Ok(FoundCrate::Itself) => quote!(crate),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::gagiteck),
    }
}

/// Turn a typed function into a bound `Tool` constructor.
///
/// For `fn greet(name: String) -> String` this emits a `GreetParams`
/// deserialization struct and a `greet_tool()` function returning a
/// `gagiteck::tools::Tool` whose schema is derived from the signature:
/// the tool name is the function identifier, the description comes from
/// `description = "..."` or the doc comment (falling back to
/// `"Execute <name>"`), each parameter's JSON type is inferred from its
/// Rust type, and `Option<T>` parameters are not required.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as AttributeArgs);
    let input_fn = parse_macro_input!(item as ItemFn);

    let mut name_override = None;
    let mut description_override = None;
    let mut params_meta = Vec::<(String, String)>::new();

    for nested in args {
        match nested {
            NestedMeta::Meta(Meta::NameValue(nv)) => {
                if let Some(ident) = nv.path.get_ident() {
                    if let Lit::Str(s) = nv.lit {
                        match ident.to_string().as_str() {
                            "name" => name_override = Some(s.value()),
                            "description" => description_override = Some(s.value()),
                            _ => {}
                        }
                    }
                }
            }
            NestedMeta::Meta(Meta::List(list)) if list.path.is_ident("params") => {
                for nm in list.nested {
                    if let NestedMeta::Meta(Meta::NameValue(nv)) = nm {
                        if let (Some(ident), Lit::Str(s)) = (nv.path.get_ident(), &nv.lit) {
                            params_meta.push((ident.to_string(), s.value()));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if input_fn.sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            &input_fn.sig.ident,
            "async functions are not supported; tool callables run synchronously",
        )
        .to_compile_error()
        .into();
    }

    let fn_ident = input_fn.sig.ident.clone();
    let fn_name = fn_ident.to_string();
    let tool_name = name_override.unwrap_or(fn_name.clone());

    // description precedence: attribute, then doc comment, then "Execute <name>"
    let description = description_override
        .or_else(|| doc_comment(&input_fn))
        .unwrap_or_else(|| format!("Execute {}", tool_name));

    let mut fields = Vec::new();
    let mut param_names = Vec::new();

    for arg in &input_fn.sig.inputs {
        match arg {
            FnArg::Typed(pt) => {
                if let Pat::Ident(pi) = &*pt.pat {
                    fields.push((pi.ident.clone(), (*pt.ty).clone()));
                    param_names.push(pi.ident.to_string());
                } else {
                    return syn::Error::new_spanned(
                        &pt.pat,
                        "only simple identifiers are supported",
                    )
                    .to_compile_error()
                    .into();
                }
            }
            FnArg::Receiver(_) => {
                return syn::Error::new_spanned(arg, "methods with self are not supported")
                    .to_compile_error()
                    .into();
            }
        }
    }

    for (k, _) in &params_meta {
        if !param_names.contains(k) {
            return syn::Error::new_spanned(
                &input_fn.sig.ident,
                format!("param '{}' not found in function signature", k),
            )
            .to_compile_error()
            .into();
        }
    }

    let params_struct_ident =
        syn::Ident::new(&format!("{}Params", pascal_case(&fn_name)), fn_ident.span());
    let tool_fn_ident = syn::Ident::new(&format!("{}_tool", fn_name), fn_ident.span());

    let host = host_crate();

    let field_defs = fields.iter().map(|(id, ty)| {
        if option_inner(ty).is_some() {
            quote!(#[serde(default)] pub #id: #ty)
        } else {
            quote!(pub #id: #ty)
        }
    });

    let args_entries = fields.iter().map(|(ident, ty)| {
        let desc = params_meta
            .iter()
            .find(|(k, _)| k == &ident.to_string())
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| format!("Parameter: {}", ident));

        let (kind_ty, required) = match option_inner(ty) {
            Some(inner) => (inner, false),
            None => (ty, true),
        };
        let kind = infer_param_kind(kind_ty, &host);
        let name_lit = syn::LitStr::new(&ident.to_string(), ident.span());
        let desc_lit = syn::LitStr::new(&desc, ident.span());

        quote! {
            #host::tools::ArgSchema {
                name: #name_lit.into(),
                kind: #kind,
                description: #desc_lit.into(),
                required: #required,
            }
        }
    });

    let call_args = fields.iter().map(|(id, _)| quote!(_params.#id));

    let expanded = quote! {
        #input_fn

        #[derive(#host::serde::Deserialize)]
        pub struct #params_struct_ident {
            #(#field_defs,)*
        }

        pub fn #tool_fn_ident() -> #host::tools::Tool {
            let schema = #host::tools::ToolSchema {
                args: vec![#(#args_entries),*],
            };
            #host::tools::Tool::new(#tool_name, #description, schema).with_function(
                move |input: #host::serde_json::Value| {
                    let _params: #params_struct_ident = #host::serde_json::from_value(input)
                        .map_err(|e| {
                            #host::tools::ToolError::ParamsNotMatched(e.to_string())
                        })?;
                    let output = #fn_ident(#(#call_args),*);
                    #host::serde_json::to_value(output).map_err(|e| {
                        #host::tools::ToolError::Execution {
                            name: #tool_name.into(),
                            reason: e.to_string(),
                        }
                    })
                },
            )
        }
    };

    TokenStream::from(expanded)
}

/// Collect the function's doc comment, trimmed, if any.
fn doc_comment(input_fn: &ItemFn) -> Option<String> {
    let mut lines = Vec::new();
    for attr in &input_fn.attrs {
        if !attr.path.is_ident("doc") {
            continue;
        }
        if let Ok(Meta::NameValue(nv)) = attr.parse_meta() {
            if let Lit::Str(s) = nv.lit {
                lines.push(s.value().trim().to_string());
            }
        }
    }
    let doc = lines.join("\n").trim().to_string();
    if doc.is_empty() { None } else { Some(doc) }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    if let Type::Path(p) = ty {
        let seg = p.path.segments.last()?;
        if seg.ident == "Option" {
            if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                if let Some(syn::GenericArgument::Type(t)) = args.args.first() {
                    return Some(t);
                }
            }
        }
    }
    None
}

fn pascal_case(s: &str) -> String {
    s.split('_')
        .map(|p| {
            let mut c = p.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn infer_param_kind(ty: &Type, host: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    match ty {
        Type::Reference(r) => infer_param_kind(&r.elem, host),
        Type::Path(p) => {
            let ident = p.path.segments.last().unwrap().ident.to_string();
            match ident.as_str() {
                "String" | "str" => quote!(#host::tools::ParamKind::String),
                "bool" => quote!(#host::tools::ParamKind::Boolean),
                "i8" | "i16" | "i32" | "i64" | "i128" |
                "u8" | "u16" | "u32" | "u64" | "u128" |
                "usize" | "isize" => quote!(#host::tools::ParamKind::Integer),
                "f32" | "f64" => quote!(#host::tools::ParamKind::Number),
                "Vec" => quote!(#host::tools::ParamKind::Array),
                "HashMap" | "BTreeMap" | "Map" => quote!(#host::tools::ParamKind::Object),
                // unrecognized types degrade to string rather than failing
                _ => quote!(#host::tools::ParamKind::String),
            }
        }
        _ => quote!(#host::tools::ParamKind::String),
    }
}
